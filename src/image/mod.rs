mod rgb;
pub use rgb::{color_from_rgb8, IntoArray3};

mod depth;
pub use depth::{depth_from_luma16, depth_from_u16, is_valid_depth};

mod aux_map;
pub use aux_map::AuxMap;
