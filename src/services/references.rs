use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 digits are ascii")
}

/// Booking references look like `SC-MB3K2Q1X7ABCD`: a base-36 timestamp plus
/// five random alphanumerics, uppercased. Demo and emergency confirmations
/// prefix these further (`DEMO-`, `EMERGENCY-`) so they stay distinguishable.
pub fn generate_booking_reference() -> String {
    let timestamp = Utc::now().timestamp_millis().max(0) as u64;
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(5)
        .map(char::from)
        .collect();
    format!("SC-{}{}", to_base36(timestamp), suffix).to_uppercase()
}
