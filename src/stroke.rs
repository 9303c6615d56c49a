use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current version of the serialized stroke blob
pub const STROKE_DATA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StrokeDataError {
    #[error("Malformed stroke data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unsupported stroke data version {0}")]
    UnsupportedVersion(u32),
}

// Immutable stroke, in canvas pixel coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    points: Vec<[f32; 2]>,
    color: [u8; 4],
    thickness: f32,
}

// Stroke still being drawn
#[derive(Debug, Clone)]
pub struct MutableStroke {
    points: Vec<Pos2>,
    color: Color32,
    thickness: f32,
}

impl Stroke {
    pub fn new(color: Color32, thickness: f32, points: Vec<Pos2>) -> Self {
        Self {
            points: points.into_iter().map(|p| [p.x, p.y]).collect(),
            color: color.to_srgba_unmultiplied(),
            thickness,
        }
    }

    pub fn points(&self) -> impl Iterator<Item = Pos2> + '_ {
        self.points.iter().map(|[x, y]| Pos2::new(*x, *y))
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn color(&self) -> Color32 {
        let [r, g, b, a] = self.color;
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }

    pub fn rgba(&self) -> [u8; 4] {
        self.color
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }
}

impl MutableStroke {
    pub fn new(color: Color32, thickness: f32) -> Self {
        Self {
            points: Vec::new(),
            color,
            thickness,
        }
    }

    pub fn add_point(&mut self, point: Pos2) {
        // Skip repeats from a pointer that hasn't moved
        if self.points.last() != Some(&point) {
            self.points.push(point);
        }
    }

    pub fn to_stroke(&self) -> Stroke {
        Stroke::new(self.color, self.thickness, self.points.clone())
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }
}

#[derive(Serialize, Deserialize)]
struct StrokeData {
    version: u32,
    strokes: Vec<Stroke>,
}

/// Serialize strokes into the opaque blob stored on a project
pub fn encode_strokes(strokes: &[Stroke]) -> Result<Vec<u8>, StrokeDataError> {
    let data = StrokeData {
        version: STROKE_DATA_VERSION,
        strokes: strokes.to_vec(),
    };
    Ok(serde_json::to_vec(&data)?)
}

pub fn decode_strokes(bytes: &[u8]) -> Result<Vec<Stroke>, StrokeDataError> {
    let data: StrokeData = serde_json::from_slice(bytes)?;
    if data.version != STROKE_DATA_VERSION {
        return Err(StrokeDataError::UnsupportedVersion(data.version));
    }
    Ok(data.strokes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutable_stroke_skips_repeated_points() {
        let mut stroke = MutableStroke::new(Color32::RED, 3.0);
        stroke.add_point(Pos2::new(1.0, 1.0));
        stroke.add_point(Pos2::new(1.0, 1.0));
        stroke.add_point(Pos2::new(2.0, 1.0));
        assert_eq!(stroke.points().len(), 2);
        assert_eq!(stroke.to_stroke().point_count(), 2);
    }

    #[test]
    fn test_blob_round_trip() {
        let strokes = vec![
            Stroke::new(Color32::BLACK, 4.0, vec![Pos2::new(0.0, 0.0), Pos2::new(10.0, 5.0)]),
            Stroke::new(Color32::from_rgb(200, 10, 10), 12.0, vec![Pos2::new(3.0, 3.0)]),
        ];
        let blob = encode_strokes(&strokes).unwrap();
        assert_eq!(decode_strokes(&blob).unwrap(), strokes);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let blob = br#"{"version":7,"strokes":[]}"#;
        assert!(matches!(decode_strokes(blob), Err(StrokeDataError::UnsupportedVersion(7))));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(decode_strokes(b"\x00\x01"), Err(StrokeDataError::Malformed(_))));
    }
}
