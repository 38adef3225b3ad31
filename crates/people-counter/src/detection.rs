use crate::BoundingBox;
use uuid::Uuid;

/// Detection represents a bounding box detection in a single image.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Unique detection identifier
    id: Uuid,
    /// Bounding box in top-left, bottom-right format.
    bbox: BoundingBox,
    /// Detection confidence score.
    confidence: f32,
    /// Optional class identifier.
    class_id: Option<usize>,
}

impl Detection {
    /// Returns a new Detection
    ///
    /// # Parameters
    ///
    /// * `id`: An optional identifier. A random one is generated when `None`.
    /// * `bbox`: A bounding box object.
    /// * `confidence`: Detection confidence score.
    /// * `class_id`: An optional class identifier.
    pub fn new(
        id: Option<Uuid>,
        bbox: BoundingBox,
        confidence: f32,
        class_id: Option<usize>,
    ) -> Detection {
        Detection {
            id: id.unwrap_or_else(Uuid::new_v4),
            bbox,
            confidence,
            class_id,
        }
    }

    /// Returns the unique id of the detection
    pub fn id(&self) -> &Uuid {
        &self.id
    }

    /// Returns a BoundingBox of the detection co-ordinates
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Returns the confidence of the detection
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Returns the class identifier of the detection
    pub fn class_id(&self) -> Option<usize> {
        self.class_id
    }
}
