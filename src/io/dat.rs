//! Binary `.dat` volumes read by the TV-L1 label smoother.
//!
//! Layout:
//! - Version: u8, always 1
//! - Big-endian flag: u8
//! - Size of the unsigned integers that follow: u8, always 4
//! - Element size: u32 (4 for f32, 8 for f64)
//! - Dimensions: u32 each, see [`DatLayout`]
//! - Data: channel-major, then X, Y and Z, row-major
//!
//! Files are written little-endian with f32 elements. Both byte orders and
//! element sizes are read.
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use ndarray::{Array4, ArrayView4, Axis};

use crate::error::{Error, Result};

const VERSION: u8 = 1;
const UINT_SIZE: u8 = 4;
const MAX_RESERVED_ELEMS: usize = 1 << 20;

/// Header flavour of a `.dat` file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatLayout {
    /// Dimensions `(C * X, Y, Z)`. The number of labels is not stored, so the
    /// reader must be told.
    Datacost { num_labels: usize },
    /// Dimensions `(C, X, Y, Z)`.
    Groundtruth,
}

/// Writes a `[X, Y, Z, C]` volume.
pub fn write_dat<W: Write>(writer: &mut W, volume: ArrayView4<f32>, layout: DatLayout) -> Result<()> {
    let (nx, ny, nz, nc) = volume.dim();
    let dims = match layout {
        DatLayout::Datacost { num_labels } => {
            if num_labels != nc {
                return Err(Error::shape_mismatch("datacost labels", &[num_labels], &[nc]));
            }
            vec![nc * nx, ny, nz]
        }
        DatLayout::Groundtruth => vec![nc, nx, ny, nz],
    };

    writer.write_all(&[VERSION, 0, UINT_SIZE])?;
    writer.write_all(&(std::mem::size_of::<f32>() as u32).to_le_bytes())?;
    for dim in dims {
        let dim = u32::try_from(dim)
            .map_err(|_| Error::invalid_parameter(format!("Dimension {dim} does not fit in u32")))?;
        writer.write_all(&dim.to_le_bytes())?;
    }

    for channel in volume.axis_iter(Axis(3)) {
        for value in channel.iter() {
            writer.write_all(&value.to_le_bytes())?;
        }
    }
    Ok(())
}

pub fn write_dat_file<P: AsRef<Path>>(path: P, volume: ArrayView4<f32>, layout: DatLayout) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_dat(&mut writer, volume, layout)?;
    writer.flush()?;
    Ok(())
}

struct Header {
    big_endian: bool,
    elem_size: u32,
}

impl Header {
    fn read_u32<R: Read>(&self, reader: &mut R) -> Result<u32> {
        let mut bytes = [0u8; 4];
        reader.read_exact(&mut bytes)?;
        Ok(if self.big_endian {
            u32::from_be_bytes(bytes)
        } else {
            u32::from_le_bytes(bytes)
        })
    }

    fn read_value<R: Read>(&self, reader: &mut R) -> Result<f32> {
        match self.elem_size {
            4 => {
                let mut bytes = [0u8; 4];
                reader.read_exact(&mut bytes)?;
                Ok(if self.big_endian {
                    f32::from_be_bytes(bytes)
                } else {
                    f32::from_le_bytes(bytes)
                })
            }
            _ => {
                let mut bytes = [0u8; 8];
                reader.read_exact(&mut bytes)?;
                Ok(if self.big_endian {
                    f64::from_be_bytes(bytes)
                } else {
                    f64::from_le_bytes(bytes)
                } as f32)
            }
        }
    }
}

/// Reads a volume back as `[X, Y, Z, C]`. f64 files are narrowed to f32.
pub fn read_dat<R: Read>(reader: &mut R, layout: DatLayout) -> Result<Array4<f32>> {
    let mut preamble = [0u8; 3];
    reader.read_exact(&mut preamble)?;
    let [version, big_endian, uint_size] = preamble;
    if version != VERSION {
        return Err(Error::Parser(format!(
            "Unsupported dat version {version}, expected {VERSION}"
        )));
    }
    if big_endian > 1 {
        return Err(Error::Parser(format!("Invalid endianness flag {big_endian}")));
    }
    if uint_size != UINT_SIZE {
        return Err(Error::Parser(format!("Unsupported integer size {uint_size}")));
    }

    let mut header = Header {
        big_endian: big_endian == 1,
        elem_size: 0,
    };
    header.elem_size = header.read_u32(reader)?;
    if header.elem_size != 4 && header.elem_size != 8 {
        return Err(Error::Parser(format!(
            "Unsupported element size {}",
            header.elem_size
        )));
    }

    let (nc, nx, ny, nz) = match layout {
        DatLayout::Datacost { num_labels } => {
            let height = header.read_u32(reader)? as usize;
            let (ny, nz) = (header.read_u32(reader)? as usize, header.read_u32(reader)? as usize);
            if num_labels == 0 || height % num_labels != 0 {
                return Err(Error::Parser(format!(
                    "First dimension {height} is not a multiple of {num_labels} labels"
                )));
            }
            (num_labels, height / num_labels, ny, nz)
        }
        DatLayout::Groundtruth => (
            header.read_u32(reader)? as usize,
            header.read_u32(reader)? as usize,
            header.read_u32(reader)? as usize,
            header.read_u32(reader)? as usize,
        ),
    };

    let num_elems = [nx, ny, nz]
        .iter()
        .try_fold(nc, |acc, dim| acc.checked_mul(*dim))
        .ok_or_else(|| {
            Error::Parser(format!("Volume {nc}x{nx}x{ny}x{nz} is too large"))
        })?;
    if num_elems == 0 {
        return Err(Error::Parser("Empty dat volume".to_string()));
    }

    // The header is not trusted for the allocation, short files fail on read.
    let mut values = Vec::with_capacity(num_elems.min(MAX_RESERVED_ELEMS));
    for _ in 0..num_elems {
        values.push(header.read_value(reader)?);
    }

    let channel_major = Array4::from_shape_vec((nc, nx, ny, nz), values)
        .map_err(|err| Error::Parser(err.to_string()))?;
    Ok(channel_major.permuted_axes([1, 2, 3, 0]).as_standard_layout().into_owned())
}

pub fn read_dat_file<P: AsRef<Path>>(path: P, layout: DatLayout) -> Result<Array4<f32>> {
    let mut reader = BufReader::new(File::open(path)?);
    read_dat(&mut reader, layout)
}
