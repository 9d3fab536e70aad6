use crate::constants::PING_RESPONSE;

pub async fn ping() -> &'static str {
    PING_RESPONSE
}
