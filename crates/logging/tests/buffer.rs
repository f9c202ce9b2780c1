use logging::{buffer, fmt::RenderedLog};
use tracing::{info, subscriber::with_default, warn};
use tracing_subscriber::{layer::SubscriberExt, registry::Registry};

fn find<'a>(logs: &'a [RenderedLog], message: &str) -> Option<&'a RenderedLog> {
    logs.iter().find(|l| l.message == message)
}

#[test]
fn buffer_captures_rendered_events() {
    let subscriber = Registry::default().with(buffer::layer());
    with_default(subscriber, || {
        info!(path = "A>B", up = false, "invoke");
        warn!(critical = true, count = 3);
    });

    let logs = buffer::snapshot();
    let invoke = find(&logs, "invoke").expect("invoke event");
    assert_eq!(invoke.level, "INFO");
    assert_eq!(invoke.fields, "path=\"A>B\" up=false");
    assert!(invoke.line().contains("msg=\"invoke\""));

    let warned = logs
        .iter()
        .find(|l| l.fields == "critical=true count=3")
        .expect("field-only event");
    assert_eq!(warned.level, "WARN");
    assert!(warned.message.is_empty());
}
