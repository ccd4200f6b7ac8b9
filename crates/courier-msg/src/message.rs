//! ---
//! courier_section: "02-messaging-data-model"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Message envelopes and unique id generation."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::any::Any;
use std::fmt;

use crate::envelope::Envelope;
use crate::uid::MsgUid;

/// Identity shared by every message variant. Immutable once constructed.
#[derive(Debug, PartialEq, Eq)]
pub struct MsgHeader {
    msg_id: i32,
    unique_id: MsgUid,
}

impl MsgHeader {
    /// Create a header with the given discriminator and a fresh unique id.
    pub fn new(msg_id: i32) -> Self {
        Self {
            msg_id,
            unique_id: MsgUid::next(),
        }
    }

    /// Caller-assigned discriminator. Several messages may share it.
    pub fn msg_id(&self) -> i32 {
        self.msg_id
    }

    /// Unique id assigned at construction.
    pub fn unique_id(&self) -> MsgUid {
        self.unique_id
    }
}

/// Behaviour common to every message variant carried by the queue.
///
/// Implementors must not be `Clone`: a message has a single owner at any
/// instant and moves between owners only through [`Message::transfer`].
pub trait Message: Any + Send {
    /// Identity of this message.
    fn header(&self) -> &MsgHeader;

    /// Caller-assigned discriminator.
    fn msg_id(&self) -> i32 {
        self.header().msg_id()
    }

    /// Unique id assigned at construction.
    fn unique_id(&self) -> MsgUid {
        self.header().unique_id()
    }

    /// Hand the message over to a new owning [`Envelope`].
    ///
    /// Resolved on the concrete variant, so the envelope keeps the full
    /// payload type even when the caller only holds a `Box<dyn Message>`.
    fn transfer(self: Box<Self>) -> Envelope;

    /// Borrow as [`Any`] for checked downcasts.
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrow as [`Any`] for checked downcasts.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Convert into a boxed [`Any`] for by-value downcasts.
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

/// Message without payload; the discriminator is the whole content.
///
/// Messages cannot be duplicated:
///
/// ```compile_fail
/// use courier_msg::Msg;
///
/// let msg = Msg::new(1);
/// let copy = msg.clone();
/// ```
#[derive(Debug)]
pub struct Msg {
    header: MsgHeader,
}

impl Msg {
    /// Construct a bare message with a fresh unique id.
    pub fn new(msg_id: i32) -> Self {
        Self {
            header: MsgHeader::new(msg_id),
        }
    }
}

impl Message for Msg {
    fn header(&self) -> &MsgHeader {
        &self.header
    }

    fn transfer(self: Box<Self>) -> Envelope {
        Envelope::adopt(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

/// Message owning a payload of type `P`.
///
/// The payload is moved in at construction and can be mutated in place by
/// whoever currently owns the message.
pub struct DataMsg<P> {
    header: MsgHeader,
    payload: P,
}

impl<P> DataMsg<P> {
    /// Construct a typed message with a fresh unique id.
    pub fn new(msg_id: i32, payload: P) -> Self {
        Self {
            header: MsgHeader::new(msg_id),
            payload,
        }
    }

    /// Borrow the payload.
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Mutably borrow the payload.
    pub fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    /// Consume the message and return its payload.
    pub fn into_payload(self) -> P {
        self.payload
    }
}

impl<P: fmt::Debug> fmt::Debug for DataMsg<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataMsg")
            .field("msg_id", &self.header.msg_id)
            .field("unique_id", &self.header.unique_id)
            .field("payload", &self.payload)
            .finish()
    }
}

impl<P: Send + 'static> Message for DataMsg<P> {
    fn header(&self) -> &MsgHeader {
        &self.header
    }

    fn transfer(self: Box<Self>) -> Envelope {
        Envelope::adopt(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_message_reports_identity() {
        let msg = Msg::new(7);
        assert_eq!(msg.msg_id(), 7);
        assert_eq!(msg.unique_id(), msg.header().unique_id());
    }

    #[test]
    fn same_discriminator_gets_distinct_unique_ids() {
        let first = Msg::new(3);
        let second = Msg::new(3);
        assert_eq!(first.msg_id(), second.msg_id());
        assert_ne!(first.unique_id(), second.unique_id());
    }

    #[test]
    fn payload_is_mutable_in_place() {
        let mut msg = DataMsg::new(42, String::from("foo"));
        msg.payload_mut().push_str("bar");
        assert_eq!(msg.payload(), "foobar");
        assert_eq!(msg.into_payload(), "foobar");
    }

    #[test]
    fn transfer_keeps_identity_and_variant() {
        let msg: Box<dyn Message> = Box::new(DataMsg::new(5, vec![1u8, 2, 3]));
        let uid = msg.unique_id();

        let envelope = msg.transfer();
        assert_eq!(envelope.msg_id(), 5);
        assert_eq!(envelope.unique_id(), uid);
        assert_eq!(envelope.payload::<Vec<u8>>(), Some(&vec![1u8, 2, 3]));
    }
}
