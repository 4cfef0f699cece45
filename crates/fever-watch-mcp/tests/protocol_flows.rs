//! End-to-end tests for fever-watch-mcp: requests go through the protocol
//! handler exactly as a client would send them.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tokio::sync::Mutex;

use fever_watch::DisplayConfig;
use fever_watch_mcp::protocol::ProtocolHandler;
use fever_watch_mcp::session::MonitorSession;
use fever_watch_mcp::transport::{framing, StdioTransport};
use fever_watch_mcp::types::*;

// ─────────────────────── helpers ───────────────────────

fn log_path(dir: &tempfile::TempDir) -> String {
    dir.path().join("readings.ftw").display().to_string()
}

fn arc_session(dir: &tempfile::TempDir, zone: &str) -> Arc<Mutex<MonitorSession>> {
    let display = DisplayConfig::from_zone_str(zone).unwrap();
    let session = MonitorSession::open(&log_path(dir), "piZero01", display).unwrap();
    Arc::new(Mutex::new(session))
}

fn handler(dir: &tempfile::TempDir) -> ProtocolHandler {
    ProtocolHandler::new(arc_session(dir, "UTC"))
}

fn mcp_request(id: i64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

fn init_request() -> Value {
    mcp_request(
        0,
        "initialize",
        json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": { "name": "test-client", "version": "1.0" }
        }),
    )
}

async fn send(handler: &ProtocolHandler, msg: Value) -> Option<Value> {
    let parsed: JsonRpcMessage = serde_json::from_value(msg).unwrap();
    handler.handle_message(parsed).await
}

async fn send_unwrap(handler: &ProtocolHandler, msg: Value) -> Value {
    send(handler, msg).await.expect("expected response")
}

/// Call a tool and decode the JSON payload of its text content.
async fn call_tool(handler: &ProtocolHandler, name: &str, arguments: Value) -> Value {
    let resp = send_unwrap(
        handler,
        mcp_request(1, "tools/call", json!({ "name": name, "arguments": arguments })),
    )
    .await;
    let text = resp["result"]["content"][0]["text"]
        .as_str()
        .unwrap_or_else(|| panic!("{name} failed: {resp}"));
    serde_json::from_str(text).unwrap()
}

/// Call a tool that is expected to fail and return the JSON-RPC error code.
async fn call_tool_error(handler: &ProtocolHandler, name: &str, arguments: Value) -> i64 {
    let resp = send_unwrap(
        handler,
        mcp_request(1, "tools/call", json!({ "name": name, "arguments": arguments })),
    )
    .await;
    resp["error"]["code"]
        .as_i64()
        .unwrap_or_else(|| panic!("{name} should fail: {resp}"))
}

async fn read_resource(handler: &ProtocolHandler, uri: &str) -> Value {
    let resp = send_unwrap(handler, mcp_request(2, "resources/read", json!({ "uri": uri }))).await;
    let text = resp["result"]["contents"][0]["text"]
        .as_str()
        .unwrap_or_else(|| panic!("{uri} failed: {resp}"));
    serde_json::from_str(text).unwrap()
}

fn minutes_ago(minutes: i64) -> String {
    (Utc::now() - Duration::minutes(minutes)).to_rfc3339()
}

// ═══════════════════════════════════════════════════════
// HANDSHAKE AND DISCOVERY
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn initialize_reports_server_and_capabilities() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler(&dir);

    let resp = send_unwrap(&handler, init_request()).await;
    assert_eq!(resp["result"]["serverInfo"]["name"], "fever-watch-mcp");
    assert_eq!(resp["result"]["protocolVersion"], MCP_VERSION);
    assert!(resp["result"]["capabilities"]["tools"].is_object());

    let initialized = json!({ "jsonrpc": "2.0", "method": "initialized" });
    assert!(send(&handler, initialized).await.is_none());
}

#[tokio::test]
async fn lists_every_tool_resource_and_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler(&dir);

    let resp = send_unwrap(&handler, mcp_request(1, "tools/list", json!({}))).await;
    let names: Vec<&str> = resp["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    for expected in [
        "temperature_record",
        "temperature_latest",
        "temperature_history",
        "temperature_status",
        "threshold_get",
        "threshold_set",
        "alerts_list",
        "series_derive",
        "timestamp_parse",
        "timestamp_format",
        "log_prune",
    ] {
        assert!(names.contains(&expected), "missing tool {expected}");
    }

    let resp = send_unwrap(&handler, mcp_request(2, "resources/list", json!({}))).await;
    assert_eq!(resp["result"]["resources"].as_array().unwrap().len(), 3);

    let resp = send_unwrap(&handler, mcp_request(3, "resources/templates/list", json!({}))).await;
    assert_eq!(resp["result"]["resourceTemplates"].as_array().unwrap().len(), 2);

    let resp = send_unwrap(&handler, mcp_request(4, "prompts/list", json!({}))).await;
    assert_eq!(resp["result"]["prompts"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_method_tool_and_bad_version_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler(&dir);

    let resp = send_unwrap(&handler, mcp_request(1, "resources/subscribe", json!({}))).await;
    assert_eq!(resp["error"]["code"], -32601);

    assert_eq!(call_tool_error(&handler, "temperature_delete", json!({})).await, -32803);

    let bad = json!({ "jsonrpc": "1.0", "id": 9, "method": "ping" });
    let resp = send_unwrap(&handler, bad).await;
    assert_eq!(resp["error"]["code"], -32600);
    assert_eq!(resp["id"], 9);
}

// ═══════════════════════════════════════════════════════
// READINGS, STATUS AND ALERTS
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn fever_reading_opens_alert_and_normal_reading_resolves_it() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler(&dir);

    let first = call_tool(
        &handler,
        "temperature_record",
        json!({ "temperature": 38.6, "timestamp": minutes_ago(3) }),
    )
    .await;
    assert_eq!(first["fever"], true);
    assert_eq!(first["alert"]["change"], "opened");

    let status = call_tool(&handler, "temperature_status", json!({})).await;
    assert_eq!(status["status"]["status"], "fever");
    assert_eq!(status["label"], "Fever Alert");

    let active = call_tool(&handler, "alerts_list", json!({ "active_only": true })).await;
    assert_eq!(active["total"], 1);

    let second = call_tool(
        &handler,
        "temperature_record",
        json!({ "temperature": 37.1, "timestamp": minutes_ago(1) }),
    )
    .await;
    assert_eq!(second["alert"]["change"], "resolved");

    let status = call_tool(&handler, "temperature_status", json!({})).await;
    assert_eq!(status["status"]["status"], "normal");

    let active = call_tool(&handler, "alerts_list", json!({ "active_only": true })).await;
    assert_eq!(active["total"], 0);
    let all = call_tool(&handler, "alerts_list", json!({})).await;
    assert_eq!(all["total"], 1);
}

#[tokio::test]
async fn stale_reading_makes_status_unknown() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler(&dir);

    call_tool(
        &handler,
        "temperature_record",
        json!({ "temperature": 39.0, "timestamp": minutes_ago(120) }),
    )
    .await;

    let status = call_tool(&handler, "temperature_status", json!({})).await;
    assert_eq!(status["status"]["status"], "unknown");
    assert_eq!(status["last_seen"], "2h ago");
}

#[tokio::test]
async fn record_rejects_bad_timestamp_and_missing_temperature() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler(&dir);

    let code = call_tool_error(
        &handler,
        "temperature_record",
        json!({ "temperature": 37.0, "timestamp": "not a date" }),
    )
    .await;
    assert_eq!(code, -32602);

    let code = call_tool_error(&handler, "temperature_record", json!({})).await;
    assert_eq!(code, -32602);

    let code = call_tool_error(&handler, "temperature_latest", json!({})).await;
    assert_eq!(code, -32850);
}

#[tokio::test]
async fn history_is_newest_first_and_respects_limit() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler(&dir);

    for (temp, ts) in [
        (36.9, "20250822T080000000"),
        (37.4, "20250822T093000000"),
        (37.0, "20250822T090000000"),
    ] {
        call_tool(
            &handler,
            "temperature_record",
            json!({ "temperature": temp, "timestamp": ts }),
        )
        .await;
    }

    let history = call_tool(&handler, "temperature_history", json!({ "limit": 2 })).await;
    assert_eq!(history["total"], 2);
    assert_eq!(history["readings"][0]["timestamp"], "20250822T093000000");
    assert_eq!(history["readings"][0]["displayTime"], "22 Aug 2025, 09:30:00");
    assert_eq!(history["readings"][1]["timestamp"], "20250822T090000000");

    let grouped =
        call_tool(&handler, "temperature_history", json!({ "group_by_hour": true })).await;
    let groups = grouped["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["label"], "22 August 2025 • 9:00");
    assert_eq!(groups[0]["samples"].as_array().unwrap().len(), 2);
}

// ═══════════════════════════════════════════════════════
// THRESHOLDS
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn threshold_round_trip_and_range_check() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler(&dir);

    let initial = call_tool(&handler, "threshold_get", json!({})).await;
    assert_eq!(initial["threshold_c"], 38.0);
    assert_eq!(initial["is_default"], true);

    call_tool(
        &handler,
        "threshold_set",
        json!({ "threshold": 99.5, "unit": "fahrenheit" }),
    )
    .await;
    let updated = call_tool(&handler, "threshold_get", json!({})).await;
    assert!((updated["threshold_c"].as_f64().unwrap() - 37.5).abs() < 1e-9);
    assert_eq!(updated["is_default"], false);

    let code = call_tool_error(&handler, "threshold_set", json!({ "threshold": 60.0 })).await;
    assert_eq!(code, -32602);
    let code = call_tool_error(
        &handler,
        "threshold_set",
        json!({ "threshold": 38.0, "unit": "kelvin" }),
    )
    .await;
    assert_eq!(code, -32602);
}

// ═══════════════════════════════════════════════════════
// SERIES AND TIMESTAMPS
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn series_over_inline_samples_in_fahrenheit() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler(&dir);

    let result = call_tool(
        &handler,
        "series_derive",
        json!({
            "unit": "fahrenheit",
            "fever_threshold": 38.0,
            "samples": [
                { "timestamp": "20250822T100000000", "temperature": 38.5 },
                { "timestamp": "garbage", "temperature": 41.0 },
                { "timestamp": "20250822T080000000", "temperature": 36.5 },
                { "timestamp": "2025-08-22T09:00:00Z", "temperature": 37.0 }
            ]
        }),
    )
    .await;

    let series = &result["series"];
    assert_eq!(series["kind"], "series");
    assert_eq!(series["ordered_samples"].as_array().unwrap().len(), 3);
    assert_eq!(series["ordered_samples"][0]["raw_timestamp"], "20250822T080000000");
    assert!((series["min_temperature"].as_f64().unwrap() - 97.7).abs() < 1e-9);
    assert!((series["max_temperature"].as_f64().unwrap() - 101.3).abs() < 1e-9);
    assert_eq!(result["trend"], "Rising");
    assert_eq!(series["trend"], "rising");
    assert_eq!(result["labels"][0], "08:00:00");
    assert_eq!(result["fever_count"], 1);
}

#[tokio::test]
async fn series_without_data_is_explicitly_empty() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler(&dir);

    let result = call_tool(&handler, "series_derive", json!({ "date": "2025-08-22" })).await;
    assert_eq!(result["series"]["kind"], "empty");
    assert!(result["trend"].is_null());
    assert_eq!(result["fever_count"], 0);

    let code = call_tool_error(&handler, "series_derive", json!({ "date": "22.08.2025" })).await;
    assert_eq!(code, -32602);
}

#[tokio::test]
async fn timestamps_are_normalized_and_rendered_in_the_display_zone() {
    let dir = tempfile::tempdir().unwrap();
    let handler = ProtocolHandler::new(arc_session(&dir, "+05:30"));

    let parsed =
        call_tool(&handler, "timestamp_parse", json!({ "timestamp": "20250822T040135293" })).await;
    assert_eq!(parsed["valid"], true);
    assert_eq!(parsed["utc"], "2025-08-22T04:01:35.293Z");
    assert_eq!(parsed["display"], "22 Aug 2025, 09:31:35");

    let invalid =
        call_tool(&handler, "timestamp_parse", json!({ "timestamp": "2025082X040135293" })).await;
    assert_eq!(invalid["valid"], false);

    let non_string = call_tool(&handler, "timestamp_parse", json!({ "timestamp": 42 })).await;
    assert_eq!(non_string["valid"], false);

    let time_only = call_tool(
        &handler,
        "timestamp_format",
        json!({ "timestamp": "20250822T040135293", "style": "time" }),
    )
    .await;
    assert_eq!(time_only["text"], "09:31:35");

    let bad = call_tool(&handler, "timestamp_format", json!({ "timestamp": "nope" })).await;
    assert_eq!(bad["text"], "Invalid Date");

    let age = call_tool(
        &handler,
        "timestamp_format",
        json!({ "timestamp": "nope", "style": "relative" }),
    )
    .await;
    assert_eq!(age["text"], "Unknown");

    let code = call_tool_error(&handler, "timestamp_format", json!({ "style": "relative" })).await;
    assert_eq!(code, -32602);
}

#[tokio::test]
async fn named_display_zone_drives_rendering_and_date_filters() {
    let dir = tempfile::tempdir().unwrap();
    let handler = ProtocolHandler::new(arc_session(&dir, "Asia/Kolkata"));

    let formatted = call_tool(
        &handler,
        "timestamp_format",
        json!({ "timestamp": "20250822T040135293", "style": "absolute" }),
    )
    .await;
    assert_eq!(formatted["text"], "22 Aug 2025, 09:31:35");
    assert_eq!(formatted["zone"], "Asia/Kolkata");

    // 20:00Z on the 21st is already the 22nd in Kolkata.
    let samples = json!([
        { "timestamp": "2025-08-21T20:00:00Z", "temperature": 37.0 },
        { "timestamp": "2025-08-21T17:00:00Z", "temperature": 36.8 }
    ]);
    let result = call_tool(
        &handler,
        "series_derive",
        json!({ "date": "2025-08-22", "samples": samples }),
    )
    .await;
    assert_eq!(result["series"]["ordered_samples"].as_array().unwrap().len(), 1);
    assert_eq!(result["labels"][0], "01:30:00");
}

// ═══════════════════════════════════════════════════════
// RESOURCES AND PROMPTS
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn resources_reflect_recorded_readings() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler(&dir);

    call_tool(
        &handler,
        "temperature_record",
        json!({ "temperature": 38.2, "timestamp": "20250822T040135293" }),
    )
    .await;

    let status = read_resource(&handler, "fever://status").await;
    assert_eq!(status["device_id"], "piZero01");
    assert_eq!(status["current_temperature"], 38.2);

    let alerts = read_resource(&handler, "fever://alerts").await;
    assert_eq!(alerts["active"].as_array().unwrap().len(), 1);

    let series = read_resource(&handler, "fever://series/2025-08-22").await;
    assert_eq!(series["series"]["kind"], "series");
    let other_day = read_resource(&handler, "fever://series/2025-08-23").await;
    assert_eq!(other_day["series"]["kind"], "empty");

    let device = read_resource(&handler, "fever://device/piZero01").await;
    assert_eq!(device["reading_count"], 1);

    let resp = send_unwrap(
        &handler,
        mcp_request(5, "resources/read", json!({ "uri": "fever://device/crib02" })),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32850);

    let resp = send_unwrap(
        &handler,
        mcp_request(6, "resources/read", json!({ "uri": "fever://nowhere" })),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32802);
}

#[tokio::test]
async fn prompts_expand_with_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler(&dir);

    let resp = send_unwrap(
        &handler,
        mcp_request(
            1,
            "prompts/get",
            json!({ "name": "fever_check", "arguments": { "device_id": "crib02" } }),
        ),
    )
    .await;
    let text = resp["result"]["messages"][0]["content"]["text"].as_str().unwrap();
    assert!(text.contains("temperature_status with device_id \"crib02\""));

    let resp = send_unwrap(
        &handler,
        mcp_request(2, "prompts/get", json!({ "name": "observe" })),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32804);
}

// ═══════════════════════════════════════════════════════
// PERSISTENCE AND TRANSPORT
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn shutdown_persists_the_log() {
    let dir = tempfile::tempdir().unwrap();
    {
        let handler = handler(&dir);
        call_tool(
            &handler,
            "temperature_record",
            json!({ "temperature": 37.3, "timestamp": "20250822T040135293" }),
        )
        .await;
        send_unwrap(&handler, mcp_request(9, "shutdown", json!({}))).await;
    }

    let handler = handler(&dir);
    let latest = call_tool(&handler, "temperature_latest", json!({})).await;
    assert_eq!(latest["temperature"], 37.3);
    assert_eq!(latest["timestamp"], "20250822T040135293");
}

#[tokio::test]
async fn prune_drops_old_readings() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler(&dir);

    let old = (Utc::now() - Duration::days(45)).to_rfc3339();
    let old_reading = json!({ "temperature": 37.0, "timestamp": old });
    call_tool(&handler, "temperature_record", old_reading).await;
    call_tool(&handler, "temperature_record", json!({ "temperature": 37.2 })).await;

    let summary = call_tool(&handler, "log_prune", json!({})).await;
    assert_eq!(summary["readings_removed"], 1);
    assert_eq!(summary["readings_remaining"], 1);

    let code = call_tool_error(&handler, "log_prune", json!({ "reading_days": 0 })).await;
    assert_eq!(code, -32602);
}

#[tokio::test]
async fn prune_rejects_windows_beyond_the_calendar() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler(&dir);
    call_tool(&handler, "temperature_record", json!({ "temperature": 37.2 })).await;

    for args in [
        json!({ "reading_days": 100_000_000 }),
        json!({ "alert_days": i64::MAX }),
        json!({ "reading_days": 36_501 }),
    ] {
        let code = call_tool_error(&handler, "log_prune", args).await;
        assert_eq!(code, -32602);
    }

    let summary = call_tool(&handler, "log_prune", json!({ "reading_days": 36_500 })).await;
    assert_eq!(summary["readings_remaining"], 1);

    let tools = send_unwrap(&handler, mcp_request(9, "tools/list", json!({}))).await;
    let prune = tools["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == "log_prune")
        .unwrap()
        .clone();
    assert_eq!(prune["inputSchema"]["properties"]["reading_days"]["maximum"], 36_500);
}

#[tokio::test]
async fn stdio_loop_answers_requests_and_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let transport = StdioTransport::new(handler(&dir));

    let input = format!(
        "{}\n{{\"broken\":\n\n{}\n",
        init_request(),
        json!({ "jsonrpc": "2.0", "method": "initialized" }),
    );
    let mut output: Vec<u8> = Vec::new();
    transport
        .serve(tokio::io::BufReader::new(input.as_bytes()), &mut output)
        .await
        .unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["id"], 0);
    assert_eq!(lines[1]["error"]["code"], -32700);
    assert_eq!(lines[1]["id"], Value::Null);

    assert!(framing::parse_message("").is_err());
}
