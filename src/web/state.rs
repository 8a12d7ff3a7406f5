use std::sync::Arc;

use crate::scene::{GlobeScene, SceneStyle};
use crate::store::Store;

use super::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<Store>,
    pub style: Arc<SceneStyle>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<Store>) -> Self {
        let style = Arc::new(config.scene_style());
        Self {
            config: Arc::new(config),
            store,
            style,
        }
    }

    pub fn scene(&self) -> GlobeScene {
        GlobeScene::compose(&self.store.current(), &self.style)
    }
}
