/// Wavefront OBJ subset parser
///
/// Supports `v`, `vt`, `vn` and `f` statements. Material, grouping,
/// smoothing, parameter-space, point and line statements are accepted and
/// skipped. Any other statement, a wrong token count or a malformed number
/// is a syntax error, and a failed parse never yields partial geometry.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};
use nalgebra::{Point3, Vector3};
use nom::{
    character::complete::{char, i32 as integer},
    combinator::{all_consuming, opt},
    number::complete::float,
    sequence::tuple,
    IResult,
};

use crate::error::ParseError;
use crate::geometry::{Face, FaceRef, Geometry, ABSENT};

/// Parse an OBJ file from disk. The result is not yet normalized.
pub fn parse_obj_file(path: impl AsRef<Path>) -> Result<Geometry, ParseError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ParseError::FileNotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let geometry = parse_obj_reader(BufReader::new(file))?;
    info!(
        "parsed {}: {} vertices, {} faces",
        path.display(),
        geometry.vertex_count(),
        geometry.face_count()
    );
    Ok(geometry)
}

/// Parse OBJ statements held in memory
pub fn parse_obj(input: &str) -> Result<Geometry, ParseError> {
    parse_obj_reader(input.as_bytes())
}

/// Parse OBJ statements from any buffered reader
pub fn parse_obj_reader<R: BufRead>(reader: R) -> Result<Geometry, ParseError> {
    let mut buffers = ObjBuffers::default();
    let mut line_no = 0;
    for line in reader.lines() {
        line_no += 1;
        buffers.parse_line(&line?, line_no)?;
    }
    buffers.finish(line_no)
}

/// Buffers accumulated while reading one file
#[derive(Default)]
struct ObjBuffers {
    vertices: Vec<Point3<f32>>,
    texcoords: Vec<Vector3<f32>>,
    normals: Vec<Vector3<f32>>,
    faces: Vec<Face>,
}

impl ObjBuffers {
    fn parse_line(&mut self, line: &str, line_no: usize) -> Result<(), ParseError> {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return Ok(());
        };
        if keyword.starts_with('#') {
            return Ok(());
        }
        let args: Vec<&str> = tokens.collect();

        match keyword {
            "v" => {
                let [x, y, z] = numbers::<3>(&args, line_no, "v")?;
                self.vertices.push(Point3::new(x, y, z));
            }
            "vt" => {
                let (u, v, w) = match args.len() {
                    2 => {
                        let [u, v] = numbers::<2>(&args, line_no, "vt")?;
                        (u, v, 0.0)
                    }
                    _ => {
                        let [u, v, w] = numbers::<3>(&args, line_no, "vt")?;
                        (u, v, w)
                    }
                };
                self.texcoords.push(Vector3::new(u, v, w));
            }
            "vn" => {
                let [x, y, z] = numbers::<3>(&args, line_no, "vn")?;
                self.normals.push(Vector3::new(x, y, z));
            }
            "f" => {
                if args.len() < 3 {
                    return Err(ParseError::syntax(
                        line_no,
                        format!("face needs at least 3 references, got {}", args.len()),
                    ));
                }
                let refs = args
                    .iter()
                    .map(|token| Self::face_ref(token, line_no))
                    .collect::<Result<Vec<_>, _>>()?;
                self.faces.push(Face::new(refs));
            }
            "mtllib" | "usemtl" => {
                debug!("line {line_no}: ignoring material statement '{keyword}'");
            }
            "s" | "g" | "vp" | "p" | "l" => {}
            other => {
                return Err(ParseError::syntax(
                    line_no,
                    format!("unsupported statement '{other}'"),
                ));
            }
        }
        Ok(())
    }

    fn face_ref(token: &str, line_no: usize) -> Result<FaceRef, ParseError> {
        let (vertex, texcoord, normal) = face_fields(token).ok_or_else(|| {
            ParseError::syntax(line_no, format!("malformed face reference '{token}'"))
        })?;
        Ok(FaceRef::new(
            zero_based(vertex, line_no)?,
            zero_based(texcoord, line_no)?,
            zero_based(normal, line_no)?,
        ))
    }

    fn finish(self, line_no: usize) -> Result<Geometry, ParseError> {
        if self.vertices.is_empty() {
            return Err(ParseError::syntax(line_no, "model has no vertices"));
        }
        Ok(Geometry::from_parts(
            self.vertices,
            self.texcoords,
            self.normals,
            self.faces,
        ))
    }
}

/// Exactly `N` numeric arguments
fn numbers<const N: usize>(
    args: &[&str],
    line_no: usize,
    keyword: &str,
) -> Result<[f32; N], ParseError> {
    if args.len() != N {
        return Err(ParseError::syntax(
            line_no,
            format!("'{keyword}' expects {N} values, got {}", args.len()),
        ));
    }
    let mut values = [0.0; N];
    for (value, token) in values.iter_mut().zip(args) {
        *value = number(token)
            .ok_or_else(|| ParseError::syntax(line_no, format!("invalid number '{token}'")))?;
    }
    Ok(values)
}

fn number(token: &str) -> Option<f32> {
    let parsed: IResult<&str, f32> = all_consuming(float)(token);
    parsed.ok().map(|(_, value)| value)
}

type RawRef = (Option<i32>, Option<i32>, Option<i32>);

/// Split `v/vt/vn` into its three optional one-based fields
fn face_fields(token: &str) -> Option<RawRef> {
    let parsed: IResult<&str, _> = all_consuming(tuple((
        opt(integer),
        char('/'),
        opt(integer),
        char('/'),
        opt(integer),
    )))(token);
    parsed.ok().map(|(_, (v, _, vt, _, vn))| (v, vt, vn))
}

/// One-based field to zero-based; an empty field becomes [`ABSENT`]
fn zero_based(raw: Option<i32>, line_no: usize) -> Result<i32, ParseError> {
    match raw {
        None => Ok(ABSENT),
        Some(n) => n
            .checked_sub(1)
            .ok_or_else(|| ParseError::syntax(line_no, format!("index {n} out of range"))),
    }
}
