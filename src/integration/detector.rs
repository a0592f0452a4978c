//! Trait for object detection backends.

use crate::tracker::BoundingBox;

/// Trait for ball detection backends.
///
/// Implement this trait to connect any detection model to the tracker.
/// Confidence filtering and duplicate suppression are the backend's job; the
/// tracker consumes every box it is given.
///
/// # Example
///
/// ```ignore
/// use juggle_apex::{BoundingBox, DetectionSource};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, input: &[u8], width: u32, height: u32) -> Result<Vec<BoundingBox>, Self::Error> {
///         // Run inference and return ball boxes
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Run inference on raw image data and return ball boxes.
    ///
    /// An empty vector is a valid result for a frame without balls.
    fn detect(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<BoundingBox>, Self::Error>;
}
