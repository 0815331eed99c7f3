// Position wrappers making it harder to mix up block and chunk coordinates.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Blocks along each horizontal edge of a chunk.
pub const CHUNK_WIDTH: i32 = 16;

/// A block position in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    /// East-west coordinate.
    pub x: i32,
    /// Height.
    pub y: i32,
    /// North-south coordinate.
    pub z: i32,
}

impl BlockPos {
    /// Creates a block position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The chunk containing this block.
    #[must_use]
    pub const fn chunk(self) -> ChunkPos {
        ChunkPos::from_block(self.x, self.z)
    }

    /// Squared euclidean distance to `other`.
    #[must_use]
    pub fn distance_sq(self, other: Self) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        let dz = i64::from(self.z) - i64::from(other.z);
        dx * dx + dy * dy + dz * dz
    }

    /// Squared euclidean distance to `other`, ignoring height.
    #[must_use]
    pub fn horizontal_distance_sq(self, other: Self) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dz = i64::from(self.z) - i64::from(other.z);
        dx * dx + dz * dz
    }
}

impl Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

/// A chunk position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkPos {
    /// Chunk x, `floor(block_x / 16)`.
    pub x: i32,
    /// Chunk z, `floor(block_z / 16)`.
    pub z: i32,
}

impl ChunkPos {
    /// Creates a chunk position.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The chunk containing the block column (`block_x`, `block_z`).
    #[must_use]
    pub const fn from_block(block_x: i32, block_z: i32) -> Self {
        Self {
            x: block_x >> 4,
            z: block_z >> 4,
        }
    }

    /// Block x of the chunk's minimum corner.
    #[must_use]
    pub const fn min_block_x(self) -> i32 {
        self.x * CHUNK_WIDTH
    }

    /// Block z of the chunk's minimum corner.
    #[must_use]
    pub const fn min_block_z(self) -> i32 {
        self.z * CHUNK_WIDTH
    }

    /// The block at the horizontal centre of this chunk at height `y`.
    #[must_use]
    pub const fn center_block(self, y: i32) -> BlockPos {
        BlockPos::new(self.min_block_x() + 8, y, self.min_block_z() + 8)
    }

    /// Chebyshev distance to `other`, in chunks.
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }
}

impl Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}
