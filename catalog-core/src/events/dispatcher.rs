//! The `Event` envelope dispatched to a `MessageSink` (spec §6).

use super::payloads::{
    ClosePayload, CreateCntPayload, DetachPayload, EmailPayload, ErasePayload, OpenPayload,
    RegisterCntPayload,
};

/// One tagged event, fire-and-forget via the external message sink,
/// committed transactionally alongside the data change that produced it
/// (spec §6).
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CreateCnt(CreateCntPayload),
    CreateDts(CreateCntPayload),
    RegisterCnt(RegisterCntPayload),
    Erase(ErasePayload),
    EraseCnt(ErasePayload),
    Detach(DetachPayload),
    Close(ClosePayload),
    Open(OpenPayload),
    Email(EmailPayload),
}

impl Event {
    /// The event-type string a message transport would key on.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateCnt(_) => "CREATE_CNT",
            Self::CreateDts(_) => "CREATE_DTS",
            Self::RegisterCnt(_) => "REGISTER_CNT",
            Self::Erase(_) => "ERASE",
            Self::EraseCnt(_) => "ERASE_CNT",
            Self::Detach(_) => "DETACH",
            Self::Close(_) => "CLOSE",
            Self::Open(_) => "OPEN",
            Self::Email(_) => "email",
        }
    }
}
