//! Canvas program for the waveform seekbar
//!
//! Implements the iced canvas `Program` trait for seekbar rendering and
//! event-to-callback translation, following the callback-closure pattern of
//! the other widgets in this workspace. The full surface is repainted on
//! every draw call. Which of the three presentations is painted (loading
//! placeholder, static profile, or progress-synced profile) follows purely
//! from the state, so presentations can never overlap in a frame.
//!
//! Theme colors are resolved per draw call via [`crate::theme::palette`],
//! so a theme change shows up on the next repaint without new data.

use iced::alignment::{Horizontal, Vertical};
use iced::widget::canvas::{self, Event, Frame, Geometry, Program, Text};
use iced::{mouse, Point, Rectangle, Size, Theme};

use super::geometry::{
    bar_rect, drawable_width, format_time, is_bar_active, offset_in_region, progress_x,
    time_at_offset, TIME_LABEL_GUTTER,
};
use super::loading::{
    placeholder_level, PLACEHOLDER_BAR_COUNT, PLACEHOLDER_BAR_FILL, PLACEHOLDER_HEIGHT_SCALE,
};
use super::state::SeekbarState;
use crate::theme::{self, SeekbarPalette};

/// Horizontal padding between the gutter edge and a time label
const LABEL_PADDING: f32 = 5.0;

/// Font size for the gutter time labels
const LABEL_SIZE: f32 = 11.0;

/// Font size for the floating seekhead time label
const SEEKHEAD_LABEL_SIZE: f32 = 10.0;

/// Canvas state tracking pointer containment for enter/leave edges
#[derive(Debug, Clone, Copy, Default)]
pub struct SeekbarInteraction {
    /// Whether the pointer was over the drawable region last event
    pub pointer_inside: bool,
}

/// Canvas program for the waveform seekbar
///
/// `on_seek` is called with the target position in milliseconds when the
/// user clicks the waveform; the host is expected to forward it to the
/// player and let the player's own position feed drive the next repaint
/// (the click handler tolerates that race). `on_hover` is called with
/// `Some(offset)` as the pointer moves over the drawable region and `None`
/// when it leaves.
pub struct SeekbarCanvas<'a, Message, SeekFn, HoverFn>
where
    SeekFn: Fn(u64) -> Message,
    HoverFn: Fn(Option<f32>) -> Message,
{
    pub state: &'a SeekbarState,
    pub on_seek: SeekFn,
    pub on_hover: HoverFn,
}

impl<'a, Message, SeekFn, HoverFn> SeekbarCanvas<'a, Message, SeekFn, HoverFn>
where
    SeekFn: Fn(u64) -> Message,
    HoverFn: Fn(Option<f32>) -> Message,
{
    /// Drawable region of the widget in window coordinates
    fn region(bounds: Rectangle) -> Rectangle {
        Rectangle {
            x: bounds.x + TIME_LABEL_GUTTER,
            y: bounds.y,
            width: drawable_width(bounds.width),
            height: bounds.height,
        }
    }
}

impl<'a, Message, SeekFn, HoverFn> Program<Message> for SeekbarCanvas<'a, Message, SeekFn, HoverFn>
where
    Message: Clone,
    SeekFn: Fn(u64) -> Message,
    HoverFn: Fn(Option<f32>) -> Message,
{
    type State = SeekbarInteraction;

    fn update(
        &self,
        interaction: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let region = Self::region(bounds);

        if let Some(position) = cursor.position_in(region) {
            match event {
                Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                    interaction.pointer_inside = true;
                    let offset = offset_in_region(position.x, region.width);
                    return Some(canvas::Action::publish((self.on_hover)(Some(offset))));
                }
                Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                    if self.state.duration_ms > 0 {
                        let offset = offset_in_region(position.x, region.width);
                        let target = time_at_offset(offset, region.width, self.state.duration_ms);
                        return Some(canvas::Action::publish((self.on_seek)(target)));
                    }
                }
                _ => {}
            }
        } else if interaction.pointer_inside
            && matches!(event, Event::Mouse(mouse::Event::CursorMoved { .. }))
        {
            // Leave edge: hide the seekhead without moving it
            interaction.pointer_inside = false;
            return Some(canvas::Action::publish((self.on_hover)(None)));
        }

        None
    }

    fn mouse_interaction(
        &self,
        _interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(Self::region(bounds)) && self.state.duration_ms > 0 {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }

    fn draw(
        &self,
        _interaction: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let palette = theme::palette();
        let mut frame = Frame::new(renderer, bounds.size());

        let region_width = drawable_width(bounds.width);
        let height = bounds.height;
        if region_width <= 0.0 {
            return vec![frame.into_geometry()];
        }

        if self.state.loading {
            draw_loading_placeholder(
                &mut frame,
                self.state.animation_clock(),
                region_width,
                height,
                &palette,
            );
        } else if let Some(profile) = self.state.profile.as_deref() {
            draw_profile_bars(
                &mut frame,
                profile.values(),
                self.state,
                region_width,
                height,
                &palette,
            );
            draw_time_labels(&mut frame, self.state, bounds.width, height, &palette);
            draw_seekhead(&mut frame, self.state, region_width, height, &palette);
        }

        vec![frame.into_geometry()]
    }
}

/// Draw the profile bars with the progress-synced two-color sweep
///
/// Every bar is repainted on every call; bars left of the playback boundary
/// take the progress color, the rest the track color. The recolor itself is
/// how progress is shown; there is no separate overlay.
fn draw_profile_bars(
    frame: &mut Frame,
    values: &[f32],
    state: &SeekbarState,
    region_width: f32,
    height: f32,
    palette: &SeekbarPalette,
) {
    let boundary = progress_x(state.position_ms, state.duration_ms, region_width);
    let count = values.len();

    for (index, &value) in values.iter().enumerate() {
        let bar = bar_rect(index, count, value, region_width, height);
        if bar.height <= 0.0 {
            continue;
        }

        let color = if is_bar_active(bar.x, boundary) {
            palette.progress
        } else {
            palette.track
        };

        frame.fill_rectangle(
            Point::new(TIME_LABEL_GUTTER + bar.x, bar.y),
            Size::new(bar.width, bar.height),
            color,
        );
    }
}

/// Draw the animated loading placeholder bars
fn draw_loading_placeholder(
    frame: &mut Frame,
    clock: f32,
    region_width: f32,
    height: f32,
    palette: &SeekbarPalette,
) {
    // Half-density grid: one bar per two slots, centered in its slot
    let slot = region_width / (PLACEHOLDER_BAR_COUNT as f32 * 2.0);

    for bar in 0..PLACEHOLDER_BAR_COUNT {
        let level = placeholder_level(clock, bar);
        let bar_height = (level * height * PLACEHOLDER_HEIGHT_SCALE).clamp(0.0, height);
        if bar_height <= 0.0 {
            continue;
        }

        let x = TIME_LABEL_GUTTER + (bar as f32 * 2.0 + 0.5) * slot;
        let y = (height - bar_height) / 2.0;
        frame.fill_rectangle(
            Point::new(x, y),
            Size::new(slot * PLACEHOLDER_BAR_FILL, bar_height),
            palette.track,
        );
    }
}

/// Draw the current/total time labels in the side gutters
fn draw_time_labels(
    frame: &mut Frame,
    state: &SeekbarState,
    widget_width: f32,
    height: f32,
    palette: &SeekbarPalette,
) {
    frame.fill_text(Text {
        content: format_time(state.position_ms),
        position: Point::new(TIME_LABEL_GUTTER - LABEL_PADDING, height / 2.0),
        size: LABEL_SIZE.into(),
        color: palette.label,
        align_x: Horizontal::Right.into(),
        align_y: Vertical::Center.into(),
        ..Text::default()
    });

    frame.fill_text(Text {
        content: format_time(state.duration_ms),
        position: Point::new(widget_width - TIME_LABEL_GUTTER + LABEL_PADDING, height / 2.0),
        size: LABEL_SIZE.into(),
        color: palette.label,
        align_x: Horizontal::Left.into(),
        align_y: Vertical::Center.into(),
        ..Text::default()
    });
}

/// Draw the seekhead marker and its floating time label
fn draw_seekhead(
    frame: &mut Frame,
    state: &SeekbarState,
    region_width: f32,
    height: f32,
    palette: &SeekbarPalette,
) {
    if !state.seekhead_visible {
        return;
    }

    let offset = offset_in_region(state.seekhead_x, region_width);
    let marker_x = TIME_LABEL_GUTTER + offset;

    frame.fill_rectangle(
        Point::new(marker_x - 1.0, 0.0),
        Size::new(2.0, height),
        palette.seekhead,
    );

    frame.fill_text(Text {
        content: format_time(time_at_offset(offset, region_width, state.duration_ms)),
        position: Point::new(marker_x, 1.0),
        size: SEEKHEAD_LABEL_SIZE.into(),
        color: palette.seekhead,
        align_x: Horizontal::Center.into(),
        align_y: Vertical::Top.into(),
        ..Text::default()
    });
}
