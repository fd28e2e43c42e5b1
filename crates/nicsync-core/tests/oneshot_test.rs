#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use common::host;
use nicsync_core::commands;
use nicsync_core::policy::{HNS_STATE_KEY, SDN_REMOTE_ARP_MAC_ADDRESS, SDN_REMOTE_ARP_MAC_VALUE};
use nicsync_core::{CoreError, OneShotSetter, SetterOutcome, Step};
use tokio_test::{assert_err, assert_ok};

const SET: &str = "Set-ItemProperty";
const RESTART: &str = r#"Restart-Service -Name "hns""#;

fn key_probe() -> String {
    commands::test_path(HNS_STATE_KEY)
}

fn value_read() -> String {
    commands::registry_value(HNS_STATE_KEY, SDN_REMOTE_ARP_MAC_VALUE)
}

#[tokio::test]
async fn mismatch_writes_then_restarts_service() {
    let (mock, shell) = host();
    mock.respond(&key_probe(), "True")
        .respond(&value_read(), "00-00-00-00-00-00");
    let setter = OneShotSetter::sdn_remote_arp();

    let outcome = setter.ensure(&shell).await.unwrap();

    assert_eq!(outcome, SetterOutcome::Applied);
    assert!(setter.is_applied().await);
    let calls = mock.calls();
    let set = calls.iter().position(|c| c.command.contains(SET)).unwrap();
    let restart = calls.iter().position(|c| c.command == RESTART).unwrap();
    assert!(set < restart);
    assert!(calls[set].command.contains(SDN_REMOTE_ARP_MAC_ADDRESS));
}

#[tokio::test]
async fn second_call_issues_no_commands() {
    let (mock, shell) = host();
    mock.respond(&key_probe(), "True");
    let setter = OneShotSetter::sdn_remote_arp();
    assert_ok!(setter.ensure(&shell).await);
    mock.clear_calls();

    let outcome = assert_ok!(setter.ensure(&shell).await);

    assert_eq!(outcome, SetterOutcome::AlreadyApplied);
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn matching_value_is_not_rewritten() {
    let (mock, shell) = host();
    mock.respond(&key_probe(), "True")
        .respond(&value_read(), SDN_REMOTE_ARP_MAC_ADDRESS);
    let setter = OneShotSetter::sdn_remote_arp();

    let outcome = setter.ensure(&shell).await.unwrap();

    assert_eq!(outcome, SetterOutcome::AlreadySet);
    assert!(setter.is_applied().await);
    assert_eq!(mock.count(SET), 0);
    assert_eq!(mock.count("Restart-Service"), 0);
}

#[tokio::test]
async fn absent_key_is_skipped_and_retried() {
    let (mock, shell) = host();
    mock.respond(&key_probe(), "False");
    let setter = OneShotSetter::sdn_remote_arp();

    assert_eq!(setter.ensure(&shell).await.unwrap(), SetterOutcome::Skipped);
    assert!(!setter.is_applied().await);
    assert_eq!(mock.count(SET), 0);

    mock.respond(&key_probe(), "True");
    assert_eq!(setter.ensure(&shell).await.unwrap(), SetterOutcome::Applied);
}

#[tokio::test]
async fn restart_failure_leaves_flag_unset() {
    let (mock, shell) = host();
    mock.respond(&key_probe(), "True")
        .fail("Restart-Service", "Cannot stop service 'hns'");
    let setter = OneShotSetter::sdn_remote_arp();

    let err = setter.ensure(&shell).await.unwrap_err();

    assert!(matches!(
        err,
        CoreError::Restart {
            step: Step::ServiceRestart,
            ..
        }
    ));
    assert!(!setter.is_applied().await);

    assert_err!(setter.ensure(&shell).await);
    assert_eq!(mock.count(SET), 2);
}

#[tokio::test]
async fn write_failure_skips_restart() {
    let (mock, shell) = host();
    mock.respond(&key_probe(), "True")
        .fail(SET, "Requested registry access is not allowed.");
    let setter = OneShotSetter::sdn_remote_arp();

    let err = setter.ensure(&shell).await.unwrap_err();

    assert_eq!(err.step(), Some(Step::RegistryWrite));
    assert_eq!(mock.count("Restart-Service"), 0);
    assert!(!setter.is_applied().await);
}

#[tokio::test]
async fn probe_failure_is_attributed() {
    let (mock, shell) = host();
    mock.fail("Test-Path", "Access is denied.");

    let err = OneShotSetter::sdn_remote_arp()
        .ensure(&shell)
        .await
        .unwrap_err();

    assert_eq!(err.step(), Some(Step::KeyProbe));
}

#[tokio::test]
async fn reset_forces_a_fresh_check() {
    let (mock, shell) = host();
    mock.respond(&key_probe(), "True")
        .respond(&value_read(), SDN_REMOTE_ARP_MAC_ADDRESS);
    let setter = OneShotSetter::sdn_remote_arp();
    setter.ensure(&shell).await.unwrap();

    setter.reset().await;
    assert!(!setter.is_applied().await);
    assert_eq!(
        setter.ensure(&shell).await.unwrap(),
        SetterOutcome::AlreadySet
    );
    assert_eq!(mock.count(&key_probe()), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_restart_once() {
    let (mock, shell) = host();
    mock.respond(&key_probe(), "True");
    let setter = Arc::new(OneShotSetter::sdn_remote_arp());

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let setter = Arc::clone(&setter);
            let shell = shell.clone();
            tokio::spawn(async move { setter.ensure(&shell).await.unwrap() })
        })
        .collect();

    let mut applied = 0;
    for task in tasks {
        if task.await.unwrap() == SetterOutcome::Applied {
            applied += 1;
        }
    }

    assert_eq!(applied, 1);
    assert_eq!(mock.count("Restart-Service"), 1);
}
