//! Ground height probe used to snap placed buildings onto the terrain

/// Downward raycast against the terrain
pub trait TerrainProbe {
    /// Ground height at (x, z), or `None` if the ray hits nothing
    fn ground_height(&self, x: f32, z: f32) -> Option<f32>;
}

/// Infinite flat ground
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatTerrain {
    pub height: f32,
}

impl FlatTerrain {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl TerrainProbe for FlatTerrain {
    fn ground_height(&self, _x: f32, _z: f32) -> Option<f32> {
        Some(self.height)
    }
}

/// Flat square map centred on the origin; rays outside it miss
#[derive(Debug, Clone, Copy)]
pub struct BoundedTerrain {
    pub half_extent: f32,
    pub height: f32,
}

impl BoundedTerrain {
    pub fn new(half_extent: f32, height: f32) -> Self {
        Self {
            half_extent,
            height,
        }
    }
}

impl TerrainProbe for BoundedTerrain {
    fn ground_height(&self, x: f32, z: f32) -> Option<f32> {
        if x.abs() <= self.half_extent && z.abs() <= self.half_extent {
            Some(self.height)
        } else {
            None
        }
    }
}
