/// Errors from pointer capture negotiation.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("pointer capture is not supported by this host")]
    Unsupported,
    #[error("pointer capture denied: {0}")]
    Denied(String),
}

/// Host capability for capturing the pointer (hiding and locking the cursor).
///
/// One implementation exists per host platform; the simulation never branches
/// on platform details.
pub trait PointerCapture {
    /// Try to capture the pointer. `Ok` means capture is now active.
    fn request_capture(&mut self) -> Result<(), CaptureError>;

    /// Give the pointer back to the host.
    fn release_capture(&mut self);
}

/// Capture for hosts without a pointer: every request succeeds.
#[derive(Debug, Default)]
pub struct HeadlessCapture {
    captured: bool,
}

impl HeadlessCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }
}

impl PointerCapture for HeadlessCapture {
    fn request_capture(&mut self) -> Result<(), CaptureError> {
        self.captured = true;
        Ok(())
    }

    fn release_capture(&mut self) {
        self.captured = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_capture_toggles() {
        let mut c = HeadlessCapture::new();
        assert!(!c.is_captured());
        c.request_capture().unwrap();
        assert!(c.is_captured());
        c.release_capture();
        assert!(!c.is_captured());
    }

    #[test]
    fn error_messages() {
        let e = CaptureError::Denied("window not focused".into());
        assert_eq!(e.to_string(), "pointer capture denied: window not focused");
    }
}
