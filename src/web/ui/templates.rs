use askama::Template;
use askama_web::WebTemplate;

use crate::scene::{DetailPanel, Header, PathLayer};

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub header: Header,
    pub clock: Option<String>,
    pub detail: Option<DetailPanel>,
    pub paths: Vec<PathLayer>,
    pub status: String,
}
