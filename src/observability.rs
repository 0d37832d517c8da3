use biometrics::{Collector, Counter};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("teamchat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("teamchat.client.request_errors");

pub(crate) static STREAM_EVENTS: Counter = Counter::new("teamchat.stream.events");
pub(crate) static STREAM_ERRORS: Counter = Counter::new("teamchat.stream.errors");
pub(crate) static STREAM_CHUNKS: Counter = Counter::new("teamchat.stream.chunks");
pub(crate) static STREAM_DECODE_ERRORS: Counter = Counter::new("teamchat.stream.decode_errors");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);

    collector.register_counter(&STREAM_EVENTS);
    collector.register_counter(&STREAM_ERRORS);
    collector.register_counter(&STREAM_CHUNKS);
    collector.register_counter(&STREAM_DECODE_ERRORS);
}
