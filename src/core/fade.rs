/// Alpha fades: the per-surface interpolator and the full-screen fader.
use log::debug;

use crate::core::engine::CompletionHandle;
use crate::core::surface::UiSurface;

/// Linear interpolation of one alpha value toward a target over time.
///
/// Each surface gets its own controller; controllers share nothing, so any
/// number of them can run side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct FadeController {
    start: f32,
    target: f32,
    duration: f32,
    elapsed: f32,
}

impl FadeController {
    /// A NaN or infinite `duration` is treated as zero.
    pub fn new(start: f32, target: f32, duration: f32) -> Self {
        Self {
            start: start.clamp(0.0, 1.0),
            target: target.clamp(0.0, 1.0),
            duration: if duration.is_finite() { duration } else { 0.0 },
            elapsed: 0.0,
        }
    }

    /// Fade from the surface's current alpha.
    pub fn from_surface(surface: &dyn UiSurface, target: f32, duration: f32) -> Self {
        Self::new(surface.alpha(), target, duration)
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_finished(&self) -> bool {
        self.duration <= 0.0 || self.elapsed >= self.duration
    }

    /// Alpha at the current elapsed time.
    pub fn current(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.target;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.start + (self.target - self.start) * t
    }

    /// Advance by `dt` seconds and return the alpha for this frame, or `None`
    /// once the fade is over and the caller should settle on [`target`].
    ///
    /// [`target`]: FadeController::target
    pub fn advance(&mut self, dt: f32) -> Option<f32> {
        if self.is_finished() {
            return None;
        }
        self.elapsed += dt.max(0.0);
        Some(self.current())
    }

    /// The fixed-step alpha sequence, ending with the target exactly once.
    pub fn samples(self, dt: f32) -> FadeSamples {
        FadeSamples {
            fade: self,
            dt,
            settled: false,
        }
    }
}

/// Iterator returned by [`FadeController::samples`].
#[derive(Debug, Clone)]
pub struct FadeSamples {
    fade: FadeController,
    dt: f32,
    settled: bool,
}

impl Iterator for FadeSamples {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.settled {
            return None;
        }
        match self.fade.advance(self.dt) {
            Some(alpha) => Some(alpha),
            None => {
                self.settled = true;
                Some(self.fade.target())
            }
        }
    }
}

/// Full-screen fader used by scripted events.
///
/// Every finished fade (timed or instant) completes the engine's pending
/// event wait through the attached [`CompletionHandle`], so a wait-for-
/// completion Event step resumes exactly when the screen is done fading.
pub struct ScreenFader {
    surface: Option<Box<dyn UiSurface>>,
    fade_duration: f32,
    active: Option<FadeController>,
    completion: Option<CompletionHandle>,
}

impl ScreenFader {
    pub fn new(surface: Option<Box<dyn UiSurface>>, fade_duration: f32) -> Self {
        Self {
            surface,
            fade_duration,
            active: None,
            completion: None,
        }
    }

    pub fn with_completion(mut self, handle: CompletionHandle) -> Self {
        self.completion = Some(handle);
        self
    }

    pub fn is_fading(&self) -> bool {
        self.active.is_some()
    }

    /// Fade to black over the configured duration.
    pub fn fade_out(&mut self) {
        self.active = Some(FadeController::new(0.0, 1.0, self.fade_duration));
    }

    /// Fade back from black over the configured duration.
    pub fn fade_in(&mut self) {
        self.active = Some(FadeController::new(1.0, 0.0, self.fade_duration));
    }

    pub fn instant_fade_out(&mut self) {
        self.active = None;
        self.set_alpha(1.0);
        self.signal_complete();
    }

    pub fn instant_fade_in(&mut self) {
        self.active = None;
        self.set_alpha(0.0);
        self.signal_complete();
    }

    pub fn tick(&mut self, dt: f32) {
        let Some(fade) = self.active.as_mut() else {
            return;
        };
        match fade.advance(dt) {
            Some(alpha) => self.set_alpha(alpha),
            None => {
                let target = fade.target();
                self.active = None;
                self.set_alpha(target);
                debug!("[fader] screen fade to {} finished", target);
                self.signal_complete();
            }
        }
    }

    fn set_alpha(&mut self, alpha: f32) {
        if let Some(surface) = self.surface.as_mut() {
            surface.set_alpha(alpha);
        }
    }

    fn signal_complete(&self) {
        if let Some(handle) = &self.completion {
            handle.complete();
        }
    }
}
