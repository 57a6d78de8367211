mod dat;
pub use dat::{read_dat, read_dat_file, write_dat, write_dat_file, DatLayout};

mod ply;
pub use ply::write_points_ply;
