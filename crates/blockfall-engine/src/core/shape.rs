use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize, Serializer, ser::SerializeSeq as _};

/// Largest extent of any piece matrix along either axis.
pub const MAX_SHAPE_SIZE: usize = 4;

/// The seven piece topologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

/// Uniform choice over all seven kinds, so `rng.random::<PieceKind>()` is a spawn draw.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Returns the canonical (unrotated) matrix of this kind.
    #[must_use]
    pub const fn template(self) -> Orientation {
        TEMPLATES[self as usize]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }
}

/// Opaque color token stored in board cells.
///
/// The engine never interprets it; renderers map it to whatever their surface supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockColor {
    Cyan,
    Yellow,
    Purple,
    Green,
    Red,
    Blue,
    Orange,
    Gray,
    White,
    Rgb(u8, u8, u8),
}

/// Color assigned to each piece kind.
///
/// The same palette doubles as the set of colors used for pre-seeded terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorPalette {
    pub i: BlockColor,
    pub o: BlockColor,
    pub t: BlockColor,
    pub s: BlockColor,
    pub z: BlockColor,
    pub j: BlockColor,
    pub l: BlockColor,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::CLASSIC
    }
}

impl ColorPalette {
    pub const CLASSIC: Self = Self {
        i: BlockColor::Cyan,
        o: BlockColor::Yellow,
        t: BlockColor::Purple,
        s: BlockColor::Green,
        z: BlockColor::Red,
        j: BlockColor::Blue,
        l: BlockColor::Orange,
    };

    #[must_use]
    pub const fn color(&self, kind: PieceKind) -> BlockColor {
        match kind {
            PieceKind::I => self.i,
            PieceKind::O => self.o,
            PieceKind::T => self.t,
            PieceKind::S => self.s,
            PieceKind::Z => self.z,
            PieceKind::J => self.j,
            PieceKind::L => self.l,
        }
    }

    /// All palette entries in [`PieceKind::ALL`] order.
    #[must_use]
    pub fn colors(&self) -> [BlockColor; PieceKind::LEN] {
        PieceKind::ALL.map(|kind| self.color(kind))
    }
}

type ShapeCells = [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];

/// An R×C boolean matrix describing which cells of a piece are occupied.
///
/// Stored in a fixed 4×4 buffer; cells outside `width × height` are always
/// `false`, so two orientations compare equal exactly when their shapes match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Orientation {
    width: u8,
    height: u8,
    cells: ShapeCells,
}

impl Serialize for Orientation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Same layout as the templates: rows of 0/1 flags, e.g. [[0,1,0],[1,1,1]]
        let mut seq = serializer.serialize_seq(Some(self.height()))?;
        for row in self.rows() {
            let row: Vec<u8> = row.iter().map(|&cell| u8::from(cell)).collect();
            seq.serialize_element(&row)?;
        }
        seq.end()
    }
}

impl Orientation {
    /// Builds an orientation from rows of `0`/`1` flags.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is empty or larger than 4×4.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn from_bits<const W: usize, const H: usize>(rows: [[u8; W]; H]) -> Self {
        assert!(W > 0 && W <= MAX_SHAPE_SIZE);
        assert!(H > 0 && H <= MAX_SHAPE_SIZE);
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < H {
            let mut x = 0;
            while x < W {
                cells[y][x] = rows[y][x] != 0;
                x += 1;
            }
            y += 1;
        }
        Self {
            width: W as u8,
            height: H as u8,
            cells,
        }
    }

    /// Number of columns (C).
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    /// Number of rows (R).
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height as usize
    }

    /// Returns whether the cell at `(dx, dy)` is occupied; `false` outside the matrix.
    #[must_use]
    pub const fn is_occupied(&self, dx: usize, dy: usize) -> bool {
        dx < MAX_SHAPE_SIZE && dy < MAX_SHAPE_SIZE && self.cells[dy][dx]
    }

    /// Iterates over the rows of the matrix, each trimmed to `width` cells.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells[..self.height()]
            .iter()
            .map(|row| &row[..self.width()])
    }

    /// Iterates over the `(dx, dy)` offsets of occupied cells, row by row.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        (0..self.height).flat_map(move |dy| {
            (0..self.width).filter_map(move |dx| {
                self.cells[usize::from(dy)][usize::from(dx)].then_some((dx, dy))
            })
        })
    }

    /// Returns the matrix rotated 90° clockwise.
    ///
    /// For an R×C matrix `M` the result is the C×R matrix with
    /// `M'[i][j] = M[R-1-j][i]`.
    ///
    /// ```
    /// use blockfall_engine::Orientation;
    ///
    /// let t = Orientation::from_bits([[0, 1, 0], [1, 1, 1]]);
    /// assert_eq!(
    ///     t.rotated_clockwise(),
    ///     Orientation::from_bits([[1, 0], [1, 1], [1, 0]]),
    /// );
    /// ```
    #[must_use]
    pub const fn rotated_clockwise(&self) -> Self {
        let rows = self.height as usize;
        let cols = self.width as usize;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut i = 0;
        while i < cols {
            let mut j = 0;
            while j < rows {
                cells[i][j] = self.cells[rows - 1 - j][i];
                j += 1;
            }
            i += 1;
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }
}

const TEMPLATES: [Orientation; PieceKind::LEN] = [
    // I-piece
    Orientation::from_bits([[1, 1, 1, 1]]),
    // O-piece
    Orientation::from_bits([[1, 1], [1, 1]]),
    // T-piece
    Orientation::from_bits([[0, 1, 0], [1, 1, 1]]),
    // S-piece
    Orientation::from_bits([[0, 1, 1], [1, 1, 0]]),
    // Z-piece
    Orientation::from_bits([[1, 1, 0], [0, 1, 1]]),
    // J-piece
    Orientation::from_bits([[1, 0, 0], [1, 1, 1]]),
    // L-piece
    Orientation::from_bits([[0, 0, 1], [1, 1, 1]]),
];
