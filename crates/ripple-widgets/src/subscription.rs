//! Subscription helpers for bridging sync channels to iced subscriptions
//!
//! The analysis loader reports fetch outcomes over a `std::sync::mpsc`
//! channel, and host players typically deliver track-change/position
//! notifications the same way. This module converts such receivers into
//! iced `Subscription`s so both flows arrive as ordinary messages in the
//! update loop.
//!
//! # Usage
//!
//! ```ignore
//! use ripple_widgets::channel_subscription;
//!
//! fn subscription(&self) -> Subscription<Message> {
//!     Subscription::batch([
//!         channel_subscription(self.loader.result_receiver())
//!             .map(Message::AnalysisFetched),
//!         channel_subscription(self.player_events.clone())
//!             .map(Message::Player),
//!     ])
//! }
//! ```

use std::any::TypeId;
use std::hash::Hash;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use iced::advanced::subscription::{self, EventStream, Hasher, Recipe};
use iced::futures::stream::BoxStream;
use iced::Subscription;

/// How long the poll loop sleeps when the channel is empty
///
/// 1ms keeps position ticks and fetch outcomes effectively immediate while
/// staying CPU-friendly.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Recipe that polls an mpsc receiver as an iced subscription
struct ChannelRecipe<T> {
    /// Unique ID for subscription identity (receiver pointer address)
    id: u64,
    receiver: Arc<Mutex<Receiver<T>>>,
}

impl<T: Send + 'static> Recipe for ChannelRecipe<T> {
    type Output = T;

    fn hash(&self, state: &mut Hasher) {
        TypeId::of::<Self>().hash(state);
        self.id.hash(state);
    }

    fn stream(self: Box<Self>, _input: EventStream) -> BoxStream<'static, Self::Output> {
        let receiver = self.receiver;

        Box::pin(iced::futures::stream::unfold(receiver, |rx| async move {
            loop {
                let received = rx.lock().ok().and_then(|r| r.try_recv().ok());
                if let Some(item) = received {
                    return Some((item, rx));
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        }))
    }
}

/// Create an iced subscription from a shared mpsc channel receiver
///
/// Each distinct receiver gets its own subscription identity, so several
/// channels can be batched side by side. Use `.map()` to convert the
/// yielded items to your message type.
pub fn channel_subscription<T>(receiver: Arc<Mutex<Receiver<T>>>) -> Subscription<T>
where
    T: Send + 'static,
{
    let id = Arc::as_ptr(&receiver) as u64;

    subscription::from_recipe(ChannelRecipe { id, receiver })
}

/// Variant of [`channel_subscription`] that takes ownership of the receiver
pub fn channel_subscription_owned<T>(receiver: Receiver<T>) -> Subscription<T>
where
    T: Send + 'static,
{
    channel_subscription(Arc::new(Mutex::new(receiver)))
}
