mod box3d;
pub use box3d::{Box3D, Box3Df};
