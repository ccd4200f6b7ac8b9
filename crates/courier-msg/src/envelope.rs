//! ---
//! courier_section: "02-messaging-data-model"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Message envelopes and unique id generation."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::fmt;

use crate::message::{DataMsg, Message};
use crate::uid::MsgUid;

/// Owned, type-erased message as stored in and handed out by the queue.
///
/// The concrete variant is preserved; consumers recover it with the checked
/// downcasts below. A downcast to the wrong type never faults: it yields
/// `None`, or gives the envelope back untouched.
pub struct Envelope {
    inner: Box<dyn Message>,
}

impl Envelope {
    /// Take ownership of a boxed message. Intended for [`Message::transfer`]
    /// implementations; everyone else should use `Envelope::from`.
    pub fn adopt(inner: Box<dyn Message>) -> Self {
        Self { inner }
    }

    /// Caller-assigned discriminator of the carried message.
    pub fn msg_id(&self) -> i32 {
        self.inner.msg_id()
    }

    /// Unique id of the carried message.
    pub fn unique_id(&self) -> MsgUid {
        self.inner.unique_id()
    }

    /// Whether the carried message is of concrete type `M`.
    pub fn is<M: Message>(&self) -> bool {
        self.inner.as_any().is::<M>()
    }

    /// Borrow the carried message as `M`.
    pub fn downcast_ref<M: Message>(&self) -> Option<&M> {
        self.inner.as_any().downcast_ref::<M>()
    }

    /// Mutably borrow the carried message as `M`.
    pub fn downcast_mut<M: Message>(&mut self) -> Option<&mut M> {
        self.inner.as_any_mut().downcast_mut::<M>()
    }

    /// Unwrap the carried message as `M`, or return the envelope unchanged.
    pub fn downcast<M: Message>(self) -> Result<M, Envelope> {
        if !self.is::<M>() {
            return Err(self);
        }
        match self.inner.into_any().downcast::<M>() {
            Ok(message) => Ok(*message),
            // `is::<M>()` above guarantees the concrete type matches.
            Err(_) => unreachable!("concrete type checked before downcast"),
        }
    }

    /// Borrow the payload if this envelope carries a `DataMsg<P>`.
    pub fn payload<P: Send + 'static>(&self) -> Option<&P> {
        self.downcast_ref::<DataMsg<P>>().map(DataMsg::payload)
    }

    /// Mutably borrow the payload if this envelope carries a `DataMsg<P>`.
    pub fn payload_mut<P: Send + 'static>(&mut self) -> Option<&mut P> {
        self.downcast_mut::<DataMsg<P>>().map(DataMsg::payload_mut)
    }

    /// Take the payload out of a `DataMsg<P>`, or return the envelope unchanged.
    pub fn into_payload<P: Send + 'static>(self) -> Result<P, Envelope> {
        self.downcast::<DataMsg<P>>().map(DataMsg::into_payload)
    }

    /// Release the carried message as a trait object.
    pub fn into_message(self) -> Box<dyn Message> {
        self.inner
    }
}

impl<M: Message> From<M> for Envelope {
    fn from(message: M) -> Self {
        Box::new(message).transfer()
    }
}

impl From<Box<dyn Message>> for Envelope {
    fn from(message: Box<dyn Message>) -> Self {
        message.transfer()
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("msg_id", &self.msg_id())
            .field("unique_id", &self.unique_id())
            .finish_non_exhaustive()
    }
}
