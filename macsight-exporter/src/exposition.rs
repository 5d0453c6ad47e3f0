//! Prometheus text exposition format (version 0.0.4).

use std::fmt::Write;

use macsight_common::{MetricDescriptor, Sample};

/// Content type of [`render`] output.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render samples grouped under their descriptors.
///
/// A descriptor without samples is left out entirely, as is a sample whose
/// descriptor is not listed.
pub fn render(descriptors: &[&'static MetricDescriptor], samples: &[Sample]) -> String {
    let mut output = String::with_capacity(descriptors.len() * 128 + samples.len() * 64);

    for descriptor in descriptors {
        let mut family = samples.iter().filter(|s| s.is_for(descriptor)).peekable();
        if family.peek().is_none() {
            continue;
        }

        writeln!(
            output,
            "# HELP {} {}",
            descriptor.name,
            escape_help(descriptor.help)
        )
        .ok();
        writeln!(output, "# TYPE {} {}", descriptor.name, descriptor.kind).ok();

        for sample in family {
            write_sample(&mut output, sample);
        }
    }

    output
}

/// Write one `name{labels} value` line.
fn write_sample(output: &mut String, sample: &Sample) {
    output.push_str(sample.descriptor.name);

    let mut labels = sample.labels().peekable();
    if labels.peek().is_some() {
        output.push('{');
        for (i, (name, value)) in labels.enumerate() {
            if i > 0 {
                output.push(',');
            }
            output.push_str(name);
            output.push_str("=\"");
            push_label_value(output, value);
            output.push('"');
        }
        output.push('}');
    }

    output.push(' ');
    output.push_str(&sample_value(sample));
    output.push('\n');
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Append a label value with `\`, `"` and newlines escaped.
fn push_label_value(output: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '\\' => output.push_str("\\\\"),
            '"' => output.push_str("\\\""),
            '\n' => output.push_str("\\n"),
            _ => output.push(c),
        }
    }
}

/// Text form of a sample value. Integral readings such as page counts print
/// without a fraction; non-finite values use the exposition spellings.
fn sample_value(sample: &Sample) -> String {
    let value = sample.value;
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "+Inf" } else { "-Inf" };
        text.to_string()
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
