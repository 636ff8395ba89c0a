use alloc::string::String;

/// OCPP-J request frame, `[2, uniqueId, action, payload]` on the wire.
///
/// This crate only ever originates requests; CallResult/CallError handling
/// lives with whatever owns the socket.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct Call {
    pub unique_id: String,
    pub action: String,
    pub payload: serde_json::Value,
}

impl Call {
    pub fn encode(&self) -> String {
        serde_json::to_string(&(2, &self.unique_id, &self.action, &self.payload)).unwrap()
    }
}
