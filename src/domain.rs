pub mod contact_email;
pub mod contact_message;
pub mod contact_name;
pub mod new_contact;

pub use contact_email::ContactEmail;
pub use contact_message::ContactMessage;
pub use contact_name::ContactName;
pub use new_contact::NewContact;
