use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use itertools::izip;
use nalgebra::Vector3;
use ndarray::{ArrayView2, Axis};
use ply_rs::ply::{
    Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
    ScalarType,
};
use ply_rs::writer::Writer;

use crate::error::{Error, Result};

/// Writes points, with optional per-point RGB colors of shape (N, 3), as an ASCII PLY file.
pub fn write_points_ply<P>(
    filepath: P,
    points: &[Vector3<f32>],
    colors: Option<ArrayView2<u8>>,
) -> Result<()>
where
    P: AsRef<Path>,
{
    if let Some(colors) = &colors {
        if colors.dim() != (points.len(), 3) {
            let (rows, cols) = colors.dim();
            return Err(Error::shape_mismatch(
                "point colors",
                &[points.len(), 3],
                &[rows, cols],
            ));
        }
    }

    let mut ply = Ply::<DefaultElement>::new();
    let mut vertex_element = ElementDef::new("vertex".to_string());
    ["x", "y", "z"].iter().for_each(|key| {
        vertex_element.properties.add(PropertyDef::new(
            key.to_string(),
            PropertyType::Scalar(ScalarType::Float),
        ));
    });

    let mut vertex_array: Vec<DefaultElement> = points
        .iter()
        .map(|point| {
            let mut elem = DefaultElement::new();
            elem.insert("x".to_string(), Property::Float(point[0]));
            elem.insert("y".to_string(), Property::Float(point[1]));
            elem.insert("z".to_string(), Property::Float(point[2]));
            elem
        })
        .collect();

    if let Some(colors) = colors {
        ["red", "green", "blue"].iter().for_each(|key| {
            vertex_element.properties.add(PropertyDef::new(
                key.to_string(),
                PropertyType::Scalar(ScalarType::UChar),
            ));
        });

        for (elem, color) in izip!(vertex_array.iter_mut(), colors.axis_iter(Axis(0))) {
            elem.insert("red".to_string(), Property::UChar(color[0]));
            elem.insert("green".to_string(), Property::UChar(color[1]));
            elem.insert("blue".to_string(), Property::UChar(color[2]));
        }
    }

    ply.header.elements.add(vertex_element);
    ply.payload.insert("vertex".to_string(), vertex_array);
    ply.make_consistent()
        .map_err(|err| Error::Parser(format!("{err:?}")))?;
    ply.header.encoding = Encoding::Ascii;

    let mut buf = BufWriter::new(File::create(filepath)?);
    Writer::new().write_ply(&mut buf, &mut ply)?;

    Ok(())
}
