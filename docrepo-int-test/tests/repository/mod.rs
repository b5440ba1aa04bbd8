mod cancellation_test;
mod entity_derive_test;
mod failure_test;
mod get_items_test;
mod metrics_test;
mod options_test;
