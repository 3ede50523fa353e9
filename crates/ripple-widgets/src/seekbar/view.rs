//! Seekbar view functions
//!
//! Plain functions that take state references and callback closures and
//! return `Element`s, following iced 0.14 patterns.
//!
//! ## Usage
//!
//! ```ignore
//! // In your application's view function:
//! fn view(&self) -> Element<Message> {
//!     match self.session.state() {
//!         SessionState::Failed | SessionState::Idle => {
//!             fallback_seekbar(self.position_ms, self.duration_ms)
//!         }
//!         _ => waveform_seekbar(
//!             &self.seekbar_state,
//!             Message::Seek,
//!             Message::SeekheadHover,
//!         ),
//!     }
//! }
//! ```

use iced::widget::{container, progress_bar, row, text, Canvas};
use iced::{Center, Element, Length};

use super::canvas::SeekbarCanvas;
use super::geometry::{format_time, SEEKBAR_HEIGHT};
use super::state::SeekbarState;

/// Create a waveform seekbar element
///
/// # Arguments
///
/// * `state` - Seekbar state with the profile, playback position and
///   seekhead data
/// * `on_seek` - Callback called with the target position in milliseconds
///   when the waveform is clicked
/// * `on_hover` - Callback called with the seekhead offset as the pointer
///   moves over the waveform, and with `None` when it leaves
pub fn waveform_seekbar<'a, Message>(
    state: &'a SeekbarState,
    on_seek: impl Fn(u64) -> Message + 'a,
    on_hover: impl Fn(Option<f32>) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    Canvas::new(SeekbarCanvas {
        state,
        on_seek,
        on_hover,
    })
    .width(Length::Fill)
    .height(Length::Fixed(SEEKBAR_HEIGHT))
    .into()
}

/// Create the plain fallback seekbar shown when no profile is available
///
/// A stock progress bar flanked by the same time labels the waveform view
/// shows; used when the session has fallen back after exhausting its
/// analysis retries.
pub fn fallback_seekbar<'a, Message>(position_ms: u64, duration_ms: u64) -> Element<'a, Message>
where
    Message: 'a,
{
    let ratio = if duration_ms == 0 {
        0.0
    } else {
        (position_ms as f64 / duration_ms as f64) as f32
    };

    row![
        text(format_time(position_ms)).size(11),
        container(progress_bar(0.0..=1.0, ratio)).width(Length::Fill),
        text(format_time(duration_ms)).size(11),
    ]
    .spacing(8)
    .align_y(Center)
    .into()
}
