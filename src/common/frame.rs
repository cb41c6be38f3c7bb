use chrono::{DateTime, Utc};
use image::DynamicImage;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A raw frame as delivered by the capture layer.
///
/// `image` is `None` when the capture layer handed out a frame handle whose
/// pixel data could not be read.
pub struct Frame {
    frame_id: Uuid,
    image: Option<DynamicImage>,
    rotation_degrees: u32,
    captured_at: DateTime<Utc>,
}

impl Frame {
    pub fn new(image: DynamicImage, rotation_degrees: u32) -> Self {
        Self {
            frame_id: Uuid::new_v4(),
            image: Some(image),
            rotation_degrees,
            captured_at: Utc::now(),
        }
    }

    pub fn without_pixels(rotation_degrees: u32) -> Self {
        Self {
            frame_id: Uuid::new_v4(),
            image: None,
            rotation_degrees,
            captured_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.frame_id
    }

    pub fn image(&self) -> Option<&DynamicImage> {
        self.image.as_ref()
    }

    pub fn rotation_degrees(&self) -> u32 {
        self.rotation_degrees
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn width(&self) -> u32 {
        self.image.as_ref().map_or(0, DynamicImage::width)
    }

    pub fn height(&self) -> u32 {
        self.image.as_ref().map_or(0, DynamicImage::height)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("frame_id", &self.frame_id)
            .field("width", &self.width())
            .field("height", &self.height())
            .field("rotation_degrees", &self.rotation_degrees)
            .field("captured_at", &self.captured_at)
            .finish()
    }
}

/// Hands a frame buffer back to the capture layer.
pub trait FrameReleaser: Send + Sync {
    fn release(&self, frame_id: Uuid);
}

impl<F> FrameReleaser for F
where
    F: Fn(Uuid) + Send + Sync,
{
    fn release(&self, frame_id: Uuid) {
        self(frame_id)
    }
}

/// A frame together with the obligation to release it.
///
/// The releaser runs exactly once: either through [`FrameLease::release`] or
/// when the lease is dropped.
pub struct FrameLease {
    frame: Frame,
    releaser: Option<Arc<dyn FrameReleaser>>,
}

impl FrameLease {
    pub fn new(frame: Frame, releaser: Arc<dyn FrameReleaser>) -> Self {
        Self {
            frame,
            releaser: Some(releaser),
        }
    }

    /// A lease for frames the capture layer does not need back.
    pub fn unmanaged(frame: Frame) -> Self {
        Self {
            frame,
            releaser: None,
        }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn id(&self) -> Uuid {
        self.frame.frame_id
    }

    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if let Some(releaser) = self.releaser.take() {
            releaser.release(self.frame.frame_id);
        }
    }
}

impl Drop for FrameLease {
    fn drop(&mut self) {
        self.release_once();
    }
}

impl fmt::Debug for FrameLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameLease")
            .field("frame", &self.frame)
            .field("pending_release", &self.releaser.is_some())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{solid_image, CountingReleaser};
    use super::*;

    #[test]
    fn explicit_release_runs_once() {
        let releaser = Arc::new(CountingReleaser::default());
        let lease = FrameLease::new(Frame::new(solid_image(4, 4), 0), releaser.clone());
        let id = lease.id();
        lease.release();
        assert_eq!(releaser.count_for(id), 1);
    }

    #[test]
    fn dropping_unreleased_lease_releases() {
        let releaser = Arc::new(CountingReleaser::default());
        {
            let _lease = FrameLease::new(Frame::without_pixels(90), releaser.clone());
        }
        assert_eq!(releaser.count(), 1);
    }

    #[test]
    fn closures_act_as_releasers() {
        let hits = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = hits.clone();
        let lease = FrameLease::new(
            Frame::new(solid_image(2, 2), 180),
            Arc::new(move |_id: Uuid| {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            }),
        );
        drop(lease);
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn unmanaged_lease_has_nothing_to_release() {
        let lease = FrameLease::unmanaged(Frame::new(solid_image(2, 2), 0));
        assert!(format!("{:?}", lease).contains("pending_release: false"));
        lease.release();

        let releaser = Arc::new(CountingReleaser::default());
        let managed = FrameLease::new(Frame::without_pixels(0), releaser);
        assert!(format!("{:?}", managed).contains("pending_release: true"));
    }

    #[test]
    fn frame_without_pixels_reports_zero_size() {
        let frame = Frame::without_pixels(270);
        assert!(frame.image().is_none());
        assert_eq!((frame.width(), frame.height()), (0, 0));
        assert_eq!(frame.rotation_degrees(), 270);
    }
}
