use glam::{IVec3, Vec3};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::params::Dimension;

/// Marks a key with no particles in [`SpatialHashGrid::start_indices`].
pub const EMPTY_SLOT: u32 = u32::MAX;

const HASH_X: u32 = 15823;
const HASH_Y: u32 = 9737333;
const HASH_Z: u32 = 440817757;

/// 3x3x3 block of cell offsets around a particle's own cell.
const OFFSETS_3D: [IVec3; 27] = {
    let mut offsets = [IVec3::ZERO; 27];
    let mut i = 0;
    while i < 27 {
        offsets[i] = IVec3::new((i % 3) as i32 - 1, ((i / 3) % 3) as i32 - 1, (i / 9) as i32 - 1);
        i += 1;
    }
    offsets
};

/// 3x3 block of cell offsets in the xy plane.
const OFFSETS_2D: [IVec3; 9] = {
    let mut offsets = [IVec3::ZERO; 9];
    let mut i = 0;
    while i < 9 {
        offsets[i] = IVec3::new((i % 3) as i32 - 1, (i / 3) as i32 - 1, 0);
        i += 1;
    }
    offsets
};

/// One row of the spatial lookup table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpatialEntry {
    pub index: u32,
    pub hash: u32,
    pub key: u32,
}

/// Uniform spatial hash grid keyed by `hash % particle_count`.
///
/// Rebuilt from scratch every step: entries are sorted by key and a start
/// index table records where each key's run begins. Because the key is lossy,
/// queries also compare the full hash to reject other cells sharing the key.
pub struct SpatialHashGrid {
    cell_size: f32,
    dimension: Dimension,
    /// Entries sorted by `key`.
    entries: Vec<SpatialEntry>,
    /// `start_indices[key]` = first sorted position with that key, or `EMPTY_SLOT`.
    start_indices: Vec<u32>,
}

impl Default for SpatialHashGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialHashGrid {
    pub fn new() -> Self {
        Self {
            cell_size: 1.0,
            dimension: Dimension::Three,
            entries: Vec::new(),
            start_indices: Vec::new(),
        }
    }

    /// Rebuild the lookup table from `positions`.
    ///
    /// `cell_size` must be positive; it is the interaction radius so that a
    /// query's 3x3x3 block covers every particle within one radius.
    pub fn build(&mut self, positions: &[Vec3], cell_size: f32, dimension: Dimension) {
        self.cell_size = cell_size;
        self.dimension = dimension;
        self.entries.clear();
        self.start_indices.clear();

        let count = positions.len();
        if count == 0 {
            return;
        }
        let len = count as u32;

        self.entries.resize(count, SpatialEntry::default());
        self.start_indices.resize(count, EMPTY_SLOT);

        let cell_size = self.cell_size;
        let dimension = self.dimension;
        let make_entry = move |i: usize, pos: Vec3| {
            let hash = hash_cell(cell_coord_in(pos, cell_size, dimension));
            SpatialEntry {
                index: i as u32,
                hash,
                key: key_from_hash(hash, len),
            }
        };

        #[cfg(feature = "parallel")]
        {
            self.entries
                .par_iter_mut()
                .zip(positions.par_iter())
                .enumerate()
                .for_each(|(i, (entry, &pos))| *entry = make_entry(i, pos));
            self.entries.par_sort_unstable_by_key(|e| e.key);
        }

        #[cfg(not(feature = "parallel"))]
        {
            for (i, (entry, &pos)) in self.entries.iter_mut().zip(positions).enumerate() {
                *entry = make_entry(i, pos);
            }
            self.entries.sort_unstable_by_key(|e| e.key);
        }

        for (i, entry) in self.entries.iter().enumerate() {
            let is_run_start = i == 0 || self.entries[i - 1].key != entry.key;
            if is_run_start {
                self.start_indices[entry.key as usize] = i as u32;
            }
        }
    }

    /// Cell containing `pos` with the current cell size and dimension.
    #[inline]
    pub fn cell_of(&self, pos: Vec3) -> IVec3 {
        cell_coord_in(pos, self.cell_size, self.dimension)
    }

    /// Call `f(particle_index)` for every particle stored in `cell`.
    pub fn for_each_in_cell<F: FnMut(u32)>(&self, cell: IVec3, mut f: F) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }
        let hash = hash_cell(cell);
        let key = key_from_hash(hash, len as u32);
        let start = self.start_indices[key as usize];
        if start == EMPTY_SLOT {
            return;
        }

        for entry in &self.entries[start as usize..] {
            if entry.key != key {
                break;
            }
            if entry.hash != hash {
                continue;
            }
            f(entry.index);
        }
    }

    /// Call `f(particle_index)` for every particle in the cells surrounding `pos`
    /// (27 cells in 3-D, 9 in 2-D). Distances are not checked.
    pub fn for_each_candidate<F: FnMut(u32)>(&self, pos: Vec3, mut f: F) {
        let origin = self.cell_of(pos);
        for offset in self.offsets() {
            self.for_each_in_cell(origin.wrapping_add(*offset), &mut f);
        }
    }

    /// Call `f(j, offset, sqr_dist)` for every particle `j` within one cell
    /// size of `pos`, the particle at `pos` itself included.
    ///
    /// `offset` is `positions[j] - pos`.
    pub fn for_each_neighbour<F: FnMut(usize, Vec3, f32)>(
        &self,
        pos: Vec3,
        positions: &[Vec3],
        mut f: F,
    ) {
        let sqr_radius = self.cell_size * self.cell_size;
        self.for_each_candidate(pos, |j| {
            let j = j as usize;
            let offset = positions[j] - pos;
            let sqr_dist = offset.length_squared();
            if sqr_dist <= sqr_radius {
                f(j, offset, sqr_dist);
            }
        });
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn entries(&self) -> &[SpatialEntry] {
        &self.entries
    }

    pub fn start_indices(&self) -> &[u32] {
        &self.start_indices
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    fn offsets(&self) -> &'static [IVec3] {
        match self.dimension {
            Dimension::Two => &OFFSETS_2D,
            Dimension::Three => &OFFSETS_3D,
        }
    }
}

/// `floor(pos / cell_size)` truncated to integer cell coordinates.
#[inline]
pub fn cell_coord(pos: Vec3, cell_size: f32) -> IVec3 {
    let cell = (pos / cell_size).floor();
    IVec3::new(cell.x as i32, cell.y as i32, cell.z as i32)
}

#[inline]
fn cell_coord_in(pos: Vec3, cell_size: f32, dimension: Dimension) -> IVec3 {
    let cell = cell_coord(pos, cell_size);
    match dimension {
        Dimension::Two => IVec3::new(cell.x, cell.y, 0),
        Dimension::Three => cell,
    }
}

/// Mix cell coordinates into a 32-bit hash. Wraparound is part of the hash.
#[inline]
pub fn hash_cell(cell: IVec3) -> u32 {
    (cell.x as u32)
        .wrapping_mul(HASH_X)
        .wrapping_add((cell.y as u32).wrapping_mul(HASH_Y))
        .wrapping_add((cell.z as u32).wrapping_mul(HASH_Z))
}

/// Reduce a hash to a table slot. `len` must be non-zero.
#[inline]
pub fn key_from_hash(hash: u32, len: u32) -> u32 {
    hash % len
}
