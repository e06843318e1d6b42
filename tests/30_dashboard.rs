mod common;

use anyhow::Result;
use certily_api::models::{AssessmentStatus, Role};
use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde_json::Value;

use common::TestApp;

async fn data(app: &TestApp, path: &str, token: &str) -> Result<Value> {
    let res = app.get(path, Some(token)).await?;
    assert_eq!(res.status(), StatusCode::OK, "GET {}", path);
    let body: Value = res.json().await?;
    Ok(body["data"].clone())
}

#[tokio::test]
async fn manager_dashboard_shows_monthly_progress() -> Result<()> {
    let app = TestApp::spawn().await?;
    let cdg = app.airport("CDG").await;
    let ory = app.airport("ORY").await;
    let relay = app.shop("Relay T1", "Relay", "T1", true, &cdg).await;
    let fnac = app.shop("Fnac T2", "Fnac", "T2", true, &cdg).await;
    let elsewhere = app.shop("Relay Orly", "Relay", "Orly 1", true, &ory).await;

    app.assessment(&relay, AssessmentStatus::Finished, Utc::now()).await;
    app.assessment(&fnac, AssessmentStatus::Open, Utc::now() - Duration::days(70)).await;
    app.assessment(&elsewhere, AssessmentStatus::Finished, Utc::now()).await;

    let (manager, token) = app.user("manager@cdg.test", Some(Role::AirportManager)).await?;
    app.backend.assign_airports(manager, vec![cdg.id]).await;

    let page = data(&app, "/dashboard", &token).await?;
    assert_eq!(page["user"]["role"], "airport_manager");
    assert_eq!(page["navigation"]["audit"], "/audit");
    assert_eq!(page["view"]["kind"], "overview");

    let stats = &page["view"]["stats"];
    assert_eq!(stats["total_shops"], 2);
    assert_eq!(stats["total_assessments"], 2);
    assert_eq!(stats["completed_assessments"], 1);
    assert_eq!(stats["completion_rate"], 50);
    assert_eq!(stats["monthly"]["target"], 2);
    assert_eq!(stats["monthly"]["audited"], 1);
    assert_eq!(stats["monthly"]["percent"], 50);
    assert_eq!(stats["monthly"]["tone"], "orange");

    let options = &page["view"]["options"];
    assert_eq!(options["locations"].as_array().map(Vec::len), Some(2));
    assert_eq!(page["view"]["assessments"][0]["shop_name"], "Relay T1");
    assert_eq!(page["view"]["assessments"][0]["airport"], "CDG");

    let filtered = data(&app, "/dashboard?location=T2", &token).await?;
    assert_eq!(filtered["view"]["stats"]["total_shops"], 1);
    assert_eq!(filtered["view"]["stats"]["monthly"]["audited"], 0);
    assert_eq!(filtered["view"]["stats"]["monthly"]["tone"], "red");
    assert_eq!(filtered["view"]["filters"]["location"], "T2");

    let analytics = data(&app, "/dashboard/analytics?location=all", &token).await?;
    assert_eq!(analytics["stats"]["total_shops"], 2);
    Ok(())
}

#[tokio::test]
async fn dashboard_view_depends_on_role() -> Result<()> {
    let app = TestApp::spawn().await?;
    let cdg = app.airport("CDG").await;
    let mine = app.shop("Hermès T2", "Hermès", "T2", false, &cdg).await;
    let other = app.shop("Relay T1", "Relay", "T1", true, &cdg).await;
    app.assessment(&mine, AssessmentStatus::Send, Utc::now()).await;
    app.assessment(&other, AssessmentStatus::Send, Utc::now()).await;

    let (owner, owner_token) = app.user("owner@hermes.test", Some(Role::ShopOwner)).await?;
    app.backend.assign_shops(owner, vec![mine.id]).await;
    let (worker, worker_token) = app.user("worker@cdg.test", Some(Role::AirportWorker)).await?;
    app.backend.assign_airports(worker, vec![cdg.id]).await;

    let page = data(&app, "/dashboard", &owner_token).await?;
    assert_eq!(page["view"]["kind"], "shop_owner");
    assert_eq!(page["navigation"]["audit"], Value::Null);
    let cards = page["view"]["assessments"].as_array().cloned().unwrap_or_default();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["shop_name"], "Hermès T2");
    assert_eq!(cards[0]["average_rating"], 3.5);

    let page = data(&app, "/dashboard", &worker_token).await?;
    assert_eq!(page["view"]["kind"], "worker");
    assert_eq!(page["view"]["litige_endpoint"], "/litige");
    assert_eq!(page["view"]["shops"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn assessment_list_can_be_narrowed_to_a_shop() -> Result<()> {
    let app = TestApp::spawn().await?;
    let cdg = app.airport("CDG").await;
    let a = app.shop("Relay T1", "Relay", "T1", true, &cdg).await;
    let b = app.shop("Fnac T2", "Fnac", "T2", true, &cdg).await;
    app.assessment(&a, AssessmentStatus::Finished, Utc::now() - Duration::days(1)).await;
    app.assessment(&a, AssessmentStatus::Open, Utc::now()).await;
    app.assessment(&b, AssessmentStatus::Send, Utc::now()).await;

    let (_, token) = app.user("admin@certily.test", Some(Role::SuperUser)).await?;

    let all = data(&app, "/dashboard/assessments", &token).await?;
    assert_eq!(all["total"], 3);

    let only_a = data(&app, &format!("/dashboard/assessments?shop_id={}", a.id), &token).await?;
    assert_eq!(only_a["total"], 2);
    // Newest first
    assert_eq!(only_a["assessments"][0]["status"], "open");
    assert_eq!(only_a["assessments"][1]["status"], "finished");
    Ok(())
}

#[tokio::test]
async fn shop_list_flags_this_months_audits() -> Result<()> {
    let app = TestApp::spawn().await?;
    let cdg = app.airport("CDG").await;
    let audited = app.shop("Relay T1", "Relay", "T1", true, &cdg).await;
    app.shop("Fnac T2", "Fnac", "T2", true, &cdg).await;
    app.assessment(&audited, AssessmentStatus::Finished, Utc::now()).await;

    let (manager, token) = app.user("manager@cdg.test", Some(Role::AirportManager)).await?;
    app.backend.assign_airports(manager, vec![cdg.id]).await;

    let list = data(&app, "/dashboard/shops", &token).await?;
    let shops = list["shops"].as_array().cloned().unwrap_or_default();
    assert_eq!(shops.len(), 2);
    for shop in &shops {
        let is_audited = shop["id"] == audited.id.to_string();
        assert_eq!(shop["audited_this_month"], is_audited);
        assert_eq!(shop["assessment_count"], if is_audited { 1 } else { 0 });
        assert_eq!(shop["airport"], "CDG");
    }
    Ok(())
}

#[tokio::test]
async fn super_admin_overview_counts_everything() -> Result<()> {
    let app = TestApp::spawn().await?;
    let cdg = app.airport("CDG").await;
    let ory = app.airport("ORY").await;
    let a = app.shop("Relay T1", "Relay", "T1", true, &cdg).await;
    let b = app.shop("Relay Orly", "Relay", "Orly 1", false, &ory).await;
    app.assessment(&a, AssessmentStatus::Finished, Utc::now()).await;
    app.assessment(&b, AssessmentStatus::Reported, Utc::now()).await;

    let (_, token) = app.user("admin@certily.test", Some(Role::SuperUser)).await?;

    let overview = data(&app, "/dashboard/super-admin", &token).await?;
    assert_eq!(overview["total_shops"], 2);
    assert_eq!(overview["monthly_shops"], 1);
    assert_eq!(overview["total_assessments"], 2);
    assert_eq!(overview["by_status"]["reported"], 1);
    assert_eq!(overview["by_airport"].as_array().map(Vec::len), Some(2));
    assert_eq!(overview["monthly"]["tone"], "green");
    Ok(())
}
