use std::sync::Arc;

use attendance::config::Config;
use attendance::ezygo::{AttendanceApi, EzygoClient};
use attendance::preferences::Cutoff;
use attendance::projector::CourseReport;
use attendance::session::SessionStore;
use attendance::storage::LocalStore;

fn live_client() -> (EzygoClient, String, String) {
    dotenvy::dotenv().ok();

    let username = std::env::var("EZYGO_USERNAME").expect("EZYGO_USERNAME is not set");
    let password = std::env::var("EZYGO_PASSWORD").expect("EZYGO_PASSWORD is not set");
    let config = Config::new_from_env().expect("Failed to load config");
    let session = SessionStore::new(Arc::new(LocalStore::in_memory()));
    let client = EzygoClient::new(config, session).expect("Failed to create client");
    (client, username, password)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored --test-threads=1
async fn test_login_and_list_courses() {
    let (client, username, password) = live_client();

    let response = client.login(&username, &password).await;
    assert!(response.is_success(), "login failed: {}", response.error_message());

    let courses = client.get_courses().await.expect("Failed to fetch courses");
    println!("Fetched {} courses", courses.len());
    for course in &courses {
        println!("ID: {}, Name: {}, Code: {}", course.id, course.name, course.code);
        assert!(!course.id.is_empty(), "Course ID should not be empty");
    }
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored --test-threads=1
async fn test_attendance_for_every_course() {
    let (client, username, password) = live_client();
    assert!(client.login(&username, &password).await.is_success());

    let courses = client.get_courses().await.expect("Failed to fetch courses");
    for course in courses {
        let Some(id) = course.numeric_id() else {
            println!("Skipping non-numeric course id {}", course.id);
            continue;
        };
        match client.get_course_attendance(id).await {
            Ok(summary) => {
                let report = CourseReport::new(&course, &summary, Cutoff::default());
                println!(
                    "{} [{}]: {}% ({} of {}), can skip {}",
                    report.name,
                    report.code,
                    report.percentage,
                    report.present,
                    report.total,
                    report.skippable
                );
                assert!(report.percentage <= 100);
            }
            Err(e) => println!("Attendance for {} failed: {}", course.id, e),
        }
    }
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored --test-threads=1
async fn test_profile_and_logout() {
    let (client, username, password) = live_client();
    assert!(client.login(&username, &password).await.is_success());

    let profile = client.get_my_profile().await.expect("Failed to fetch profile");
    println!("Signed in as {}", profile.display_name());

    client.logout();
    assert!(!client.is_authenticated());
}
