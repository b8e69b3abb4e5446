//! Reply texts and notification bodies for each dialogue profile.

use crate::config::DialogueProfile;

use super::session::{Session, field};
use super::state::RegistrationStep;

// ── Hotel ────────────────────────────────────────────────────────────

pub const HOTEL_WELCOME: &str = "\
🙏 Welcome to Kamdhenu Sadan – A Sacred Stay in the Heart of Devbhoomi
Your peace and comfort are our blessings to serve.
Please select your preferred language to begin your journey with us:
1️⃣ हिंदी
2️⃣ English";

pub const LANGUAGE_REPROMPT: &str = "Please select a valid language option:\n1️⃣ हिंदी\n2️⃣ English";

pub const HINDI_UNAVAILABLE: &str =
    "क्षमा करें, हिंदी संस्करण जल्द ही उपलब्ध होगा। कृपया English चुनें।";

pub const MAIN_MENU: &str = "How can I assist you today?\n1️⃣ Registration\n2️⃣ Room Service";

pub const MAIN_MENU_REPROMPT: &str =
    "Please choose a valid option:\n1️⃣ Registration\n2️⃣ Room Service";

pub const ROOM_SERVICE_MENU: &str = "\
🛎️ How can we help you in your room? Please choose an option:
1️⃣ Order Food
2️⃣ Request Housekeeping
3️⃣ Report an Issue / Complaint";

pub const ROOM_SERVICE_REPROMPT: &str = "Invalid option. Please choose 1-3.";

pub const ASK_ROOM_NUMBER: &str = "Please enter your room number:";
pub const ASK_HOUSEKEEPING_ROOM: &str = "Please enter your room number for housekeeping:";
pub const ASK_ORDER: &str = "What would you like to order?";
pub const ASK_COMPLAINT: &str = "Please describe your complaint:";

pub const ROOM_SERVICE_SENT: &str = "Room service request sent.";
pub const HOUSEKEEPING_SENT: &str = "Housekeeping request sent.";
pub const COMPLAINT_SENT: &str = "Complaint sent to hotel management.";

pub const REGISTRATION_INTRO: &str =
    "📝 Let’s get you checked in. Please provide the following details:\n* Full Name:";
pub const ID_PHOTO_MISSING: &str = "No photo received. Please resend your ID card image.";
pub const REGISTRATION_DONE: &str = "Registration completed. Thank you!";

pub const SESSION_RESTART: &str = "\
Something went wrong. Restarting session. Please select language again:
1️⃣ हिंदी
2️⃣ English";

// ── Restaurant ───────────────────────────────────────────────────────

pub const RESTAURANT_WELCOME: &str = "\
Welcome to Demo Restaurant! 🍽️

1. Menu
2. Reservation
3. Promotions

Reply with a number or keyword.";

pub const RESTAURANT_MENU_LINK: &str = "Here is the menu: https://your-menu-url.com/menu.pdf";

pub const RESERVATION_FORMAT: &str =
    "Please send your reservation in this format:\nName, Date, Time, Guests";

pub const PROMOTION: &str = "🔥 Special Offer: 20% off this week on all orders above ₹500!";

// ── Shared ───────────────────────────────────────────────────────────

pub const RESERVATION_RECEIVED: &str = "\
✅ Reservation received! We'll get back to you shortly.

You'll also receive a feedback form after your reservation.";

/// Greeting sent on a fresh session or a `menu` reset.
pub fn welcome(profile: DialogueProfile) -> &'static str {
    match profile {
        DialogueProfile::Hotel => HOTEL_WELCOME,
        DialogueProfile::Restaurant => RESTAURANT_WELCOME,
    }
}

/// Prompt asking for the value collected at `step`.
pub fn registration_prompt(step: RegistrationStep) -> &'static str {
    match step {
        RegistrationStep::Name => REGISTRATION_INTRO,
        RegistrationStep::Checkin => "* Check-In Date (YYYY-MM-DD):",
        RegistrationStep::Checkout => "* Check-Out Date (YYYY-MM-DD):",
        RegistrationStep::GuestCount => "* Number of Guests:",
        RegistrationStep::IdPhoto => {
            "📎 Kindly upload a valid Government-issued ID (Aadhar, PAN, etc.):"
        }
    }
}

pub fn room_service_alert(session: &Session) -> String {
    format!(
        "Room Service Request:\nRoom: {}\nOrder: {}",
        field(&session.room_number),
        field(&session.request)
    )
}

pub fn housekeeping_alert(session: &Session) -> String {
    format!("Housekeeping Request:\nRoom: {}", field(&session.room_number))
}

pub fn complaint_alert(session: &Session) -> String {
    format!("Guest Complaint:\n{}", field(&session.complaint))
}

pub fn registration_summary(session: &Session) -> String {
    format!(
        "New Guest Registration:\nName: {}\nCheck-in: {}\nCheck-out: {}\nGuests: {}\nID: {}",
        field(&session.name),
        field(&session.checkin),
        field(&session.checkout),
        field(&session.guest_count),
        field(&session.id_document),
    )
}

pub fn reservation_email(customer: &str, details: &str) -> String {
    format!("Customer: {customer}\nDetails: {details}")
}
