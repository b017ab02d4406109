pub mod app_settings;
pub mod app_state;
pub mod match_detail;
pub mod messages;
pub mod refresher;
pub mod view_state;

#[cfg(test)]
pub(crate) mod test_support;
