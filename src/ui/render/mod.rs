mod all;
mod auth;
mod dialogs;
mod footer;
mod log;
mod menu;
mod menu_detail;
mod status;
mod task_modal;
mod tasks;

use self::log::log;
use super::*;
use footer::footer;
use status::status;

pub use all::all as render;
