/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

impl SurfaceErrorAction {
    /// Lost and outdated surfaces need a reconfigure before the next frame.
    pub fn classify(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigured,
            wgpu::SurfaceError::OutOfMemory => Self::Fatal,
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => Self::SkipFrame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_out_of_memory_is_fatal() {
        assert_eq!(
            SurfaceErrorAction::classify(&wgpu::SurfaceError::OutOfMemory),
            SurfaceErrorAction::Fatal
        );
        assert_eq!(
            SurfaceErrorAction::classify(&wgpu::SurfaceError::Outdated),
            SurfaceErrorAction::Reconfigured
        );
        assert_eq!(
            SurfaceErrorAction::classify(&wgpu::SurfaceError::Timeout),
            SurfaceErrorAction::SkipFrame
        );
    }
}
