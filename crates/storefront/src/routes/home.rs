//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;

use crate::filters;

/// Background photo for the landing hero.
const HERO_IMAGE_URL: &str = "https://images.unsplash.com/photo-1501004318641-b39e6451bec6";

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub hero_image_url: &'static str,
}

/// Display the landing page.
pub async fn home() -> HomeTemplate {
    HomeTemplate {
        hero_image_url: HERO_IMAGE_URL,
    }
}
