use serde::Serialize;
use url::form_urlencoded;

use crate::catalog::SITE_URL;

// Targets the share sheet can hand off to; Instagram has no URL scheme for
// prefilled text, so it reuses the plain message
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLinks {
    pub message: String,
    pub whatsapp: String,
    pub whatsapp_web: String,
    pub facebook: String,
}

pub fn share_message(service_title: Option<&str>) -> String {
    match service_title {
        Some(title) => format!(
            "Check out {} service on KaamLo - Your trusted partner for all local service needs!\n\nVisit: {}",
            title, SITE_URL
        ),
        None => format!(
            "Check out KaamLo - Your trusted partner for all local service needs!\n\nVisit: {}",
            SITE_URL
        ),
    }
}

pub fn share_links(service_title: Option<&str>) -> ShareLinks {
    let message = share_message(service_title);
    let encoded_message: String = form_urlencoded::byte_serialize(message.as_bytes()).collect();
    let encoded_site: String = form_urlencoded::byte_serialize(SITE_URL.as_bytes()).collect();

    ShareLinks {
        whatsapp: format!("whatsapp://send?text={}", encoded_message),
        whatsapp_web: format!("https://wa.me/?text={}", encoded_message),
        facebook: format!(
            "https://www.facebook.com/sharer/sharer.php?u={}",
            encoded_site
        ),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_the_service_when_given() {
        let message = share_message(Some("Plumber"));
        assert!(message.starts_with("Check out Plumber service on KaamLo"));
        assert!(message.ends_with(SITE_URL));
    }

    #[test]
    fn message_falls_back_to_the_app_pitch() {
        let message = share_message(None);
        assert!(message.starts_with("Check out KaamLo"));
    }

    #[test]
    fn links_are_percent_encoded() {
        let links = share_links(Some("Solar Setup"));
        assert!(links.whatsapp.starts_with("whatsapp://send?text="));
        assert!(links.whatsapp_web.starts_with("https://wa.me/?text="));
        // No raw spaces or newlines survive encoding
        let query = links.whatsapp_web.split("text=").nth(1).unwrap();
        assert!(!query.contains(' '));
        assert!(!query.contains('\n'));
        assert_eq!(
            links.facebook,
            "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fkaamlo.com"
        );
    }
}
