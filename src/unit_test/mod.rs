mod scenes;
pub(crate) use scenes::{wall_scene, WallScene};
