// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::notify::TelegramConfig;

#[tokio::test]
async fn no_channels_is_not_configured() {
    let channels = NotifyChannels::new();
    assert!(channels.is_empty());
    let err = channels.notify("t", "m").await.unwrap_err();
    assert!(matches!(err, NotifyError::NotConfigured));
}

#[test]
fn unusable_telegram_is_not_added() {
    let channels =
        NotifyChannels::new().with_telegram(TelegramNotifyAdapter::new(TelegramConfig::default()));
    assert!(channels.is_empty());
}

#[tokio::test]
async fn failing_only_channel_surfaces_its_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let telegram = TelegramNotifyAdapter::with_api_base(
        TelegramConfig {
            bot_token: "t".to_string(),
            chat_id: "c".to_string(),
            enabled: true,
        },
        format!("http://127.0.0.1:{}", port),
    );
    let channels = NotifyChannels::new().with_telegram(telegram);
    assert!(!channels.is_empty());

    let err = channels.notify("t", "m").await.unwrap_err();
    assert!(matches!(err, NotifyError::SendFailed(_)));
}
