//! Support tickets raised from the chat widget

use crate::conversation::Conversation;
use crate::error::TicketError;
use crate::types::{SupportTicket, TicketPriority};

/// Destination for support tickets (the site's contact-form endpoint)
pub trait TicketSink {
    fn submit(&self, ticket: &SupportTicket) -> Result<(), TicketError>;
}

impl<F> TicketSink for F
where
    F: Fn(&SupportTicket) -> Result<(), TicketError>,
{
    fn submit(&self, ticket: &SupportTicket) -> Result<(), TicketError> {
        self(ticket)
    }
}

impl SupportTicket {
    /// Ticket whose message is the user's side of the conversation, one turn per line
    pub fn from_conversation(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        conversation: &Conversation,
        priority: TicketPriority,
    ) -> Self {
        let message = conversation.user_texts().collect::<Vec<_>>().join("\n");
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            message,
            priority,
        }
    }
}
