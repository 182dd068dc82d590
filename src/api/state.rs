use std::sync::Arc;

use crate::core::AppConfig;
use crate::google::calendar::CalendarService;
use crate::google::sheets::SheetStore;
use crate::mailer::EmailSender;

pub struct AppState {
    pub config: AppConfig,
    pub calendar: Arc<dyn CalendarService>,
    pub sheets: Arc<dyn SheetStore>,
    pub mailer: Arc<dyn EmailSender>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        calendar: Arc<dyn CalendarService>,
        sheets: Arc<dyn SheetStore>,
        mailer: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            config,
            calendar,
            sheets,
            mailer,
        }
    }
}
