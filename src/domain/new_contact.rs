use crate::domain::contact_email::ContactEmail;
use crate::domain::contact_message::ContactMessage;
use crate::domain::contact_name::ContactName;

#[derive(Debug)]
pub struct NewContact {
    pub name: ContactName,
    pub email: ContactEmail,
    pub message: ContactMessage,
}
