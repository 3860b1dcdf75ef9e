mod event;
mod notification;
mod reminder;
mod shared;

pub use event::{Event, EventStatus, InvalidEventStatusError};
pub use notification::{
    InvalidNotificationTypeError, Notification, NotificationTemplate, NotificationType,
};
pub use reminder::{classify_window, ReminderType};
pub use shared::entity::{Entity, InvalidIDError, ID};
