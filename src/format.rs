/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;
use serde_json::Value;

use crate::model::NodeView;
use crate::model::PodClass;

/// Compact age of an entity created at `created`, as of `now`, in the
/// style of `kubectl get` ("45s", "12m", "3h", "5d").
///
/// Timestamps in the future (clock skew) read as "0s".
pub(crate) fn format_age(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = now.signed_duration_since(created).num_seconds().max(0);
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86_400 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        if hours < 10 && mins > 0 {
            format!("{}h{}m", hours, mins)
        } else {
            format!("{}h", hours)
        }
    } else {
        format!("{}d", secs / 86_400)
    }
}

/// Long-form age for the detail view header.
///
/// Rounds to the nearest minute so the header does not tick every
/// frame.
pub(crate) fn format_uptime(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = now.signed_duration_since(created).num_seconds().max(0);
    let rounded = ((secs + 30) / 60) * 60;
    if rounded == 0 {
        return "less than a minute".to_string();
    }
    humantime::format_duration(Duration::from_secs(rounded as u64)).to_string()
}

/// Second line of a node box: pod count, fleet-controller share and
/// age.
pub(crate) fn node_summary(view: &NodeView, now: DateTime<Utc>) -> String {
    let total = view.pods.len();
    let fleet = view
        .pods
        .iter()
        .filter(|pod| pod.class() == PodClass::FleetController)
        .count();
    let noun = if total == 1 { "pod" } else { "pods" };
    let age = format_age(view.node.created, now);
    if fleet > 0 {
        format!("{} {} ({} ds) · {}", total, noun, fleet, age)
    } else {
        format!("{} {} · {}", total, noun, age)
    }
}

/// Serialize a payload for the detail view.
pub(crate) fn payload_yaml(payload: &Value) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(payload)
}

/// Cut `text` to at most `width` characters, marking the cut with an
/// ellipsis.
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}
