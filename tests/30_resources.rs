mod common;

use admin_dashboard::api::companies::CompanyForm;
use admin_dashboard::api::departments::CodedForm;
use admin_dashboard::api::districts::HealthCenterForm;
use admin_dashboard::api::equipments::EquipmentForm;
use admin_dashboard::api::positions::PositionForm;
use admin_dashboard::api::profile::PasswordChange;
use admin_dashboard::api::{PageRequest, SortDir};
use admin_dashboard::auth::flow::login;
use admin_dashboard::cli::utils::read_form_over;
use admin_dashboard::ClientError;
use anyhow::Result;

async fn signed_in(server: &common::TestServer, username: &str) -> Result<admin_dashboard::ApiClient> {
    let (client, _provider) = server.client()?;
    login(&client, username, "secret").await.map_err(|e| anyhow::anyhow!(e))?;
    Ok(client)
}

#[tokio::test]
async fn company_listing_sends_paging_query() -> Result<()> {
    let server = common::spawn_backend().await?;
    let client = signed_in(&server, "root").await?;

    let request = PageRequest::new("companyName").page(2).size(10).sort_dir(SortDir::Desc);
    let page = client.companies().list(&request).await?;

    assert_eq!(page.total_elements, 23);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.content.len(), 3);
    assert_eq!(page.content[0].company_name, "Company 03");
    assert!(!page.has_next(&request));

    let call = server.state.requests_to("/api/companies").pop().expect("listing call");
    assert_eq!(call.query["page"], "2");
    assert_eq!(call.query["size"], "10");
    assert_eq!(call.query["sortBy"], "companyName");
    assert_eq!(call.query["sortDir"], "desc");
    assert_eq!(call.authorization.as_deref(), Some("Bearer tok-root"));
    Ok(())
}

#[tokio::test]
async fn missing_token_maps_to_unauthorized() -> Result<()> {
    let server = common::spawn_backend().await?;
    let (client, _provider) = server.client()?;

    let err = client.companies().list(&PageRequest::new("companyName")).await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(ref m) if m == "Missing token"));
    assert_eq!(err.status_code(), Some(401));
    Ok(())
}

#[tokio::test]
async fn server_message_wins_over_fallback() -> Result<()> {
    let server = common::spawn_backend().await?;
    let client = signed_in(&server, "root").await?;

    let form = CompanyForm {
        company_name: "Duplicate".into(),
        company_address: "1 Road".into(),
        contact_person: "Ann".into(),
        phone_number: "555".into(),
        email: "ann@acme.io".into(),
    };
    let err = client.companies().create(&form).await.unwrap_err();
    assert_eq!(err.status_code(), Some(409));
    assert_eq!(err.message(), "Company name already exists");
    Ok(())
}

#[tokio::test]
async fn invalid_form_never_reaches_the_server() -> Result<()> {
    let server = common::spawn_backend().await?;
    let client = signed_in(&server, "root").await?;

    let err = client.companies().create(&CompanyForm::default()).await.unwrap_err();
    assert!(err.field_errors().is_some_and(|f| f.contains_key("companyName")));
    assert!(server
        .state
        .requests_to("/api/companies")
        .iter()
        .all(|r| r.method != "POST"));
    Ok(())
}

#[tokio::test]
async fn constant_data_fetches_every_enumeration() -> Result<()> {
    let server = common::spawn_backend().await?;
    let client = signed_in(&server, "root").await?;

    let tables = client.lookups().constant_data().await?;
    assert_eq!(tables.len(), 7);
    assert_eq!(tables[6].key, "centerType");
    assert_eq!(tables[6].rows[0]["code"], "center-type-A");
    Ok(())
}

#[tokio::test]
async fn one_failed_enumeration_fails_the_batch() -> Result<()> {
    let server = common::spawn_backend().await?;
    let client = signed_in(&server, "root").await?;
    *server.state.fail_contract_type.lock().expect("lock") = true;

    let err = client.lookups().constant_data().await.unwrap_err();
    assert_eq!(err.message(), "Enum store offline");
    Ok(())
}

#[tokio::test]
async fn users_and_password_reset() -> Result<()> {
    let server = common::spawn_backend().await?;
    let client = signed_in(&server, "root").await?;

    let users = client.users().list().await?;
    assert_eq!(users[0].phone_number, "");
    assert_eq!(users[0].health_center_id, None);
    let found = admin_dashboard::api::users::filter_users(&users, "stone");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].username, "mia");

    let err = client.users().reset_password(2, "  ").await.unwrap_err();
    assert_eq!(err.field_errors().expect("fields")["newPassword"], "New password is required");

    client.users().reset_password(2, "n3w").await?;
    let call = server.state.requests_to("/api/users/2/reset-password").pop().expect("reset call");
    assert_eq!(call.body["newPassword"], "n3w");
    Ok(())
}

#[tokio::test]
async fn profile_round_trip() -> Result<()> {
    let server = common::spawn_backend().await?;
    let client = signed_in(&server, "mia").await?;

    let profile = client.profile().get().await?;
    assert_eq!(profile.phone_number, "555-0101");
    assert_eq!(profile.email, "");
    assert_eq!(profile.extra["departmentName"], "Lab");

    client.profile().update("new@example.com", "555-0199").await?;
    let call = server.state.requests_to("/api/profile").pop().expect("update call");
    assert_eq!(call.method, "PUT");
    assert_eq!(call.body["phoneNumber"], "555-0199");

    let mismatch = PasswordChange {
        current_password: "secret".into(),
        new_password: "a".into(),
        confirm_password: "b".into(),
    };
    assert!(client.profile().change_password(&mismatch).await.is_err());
    assert!(server.state.requests_to("/api/profile/change-password").is_empty());

    let wrong_current = PasswordChange { current_password: "nope".into(), confirm_password: "a".into(), ..mismatch };
    let err = client.profile().change_password(&wrong_current).await.unwrap_err();
    assert_eq!(err.message(), "Current password is incorrect");
    Ok(())
}

#[tokio::test]
async fn coded_lookups_carry_audit_fields() -> Result<()> {
    let server = common::spawn_backend().await?;
    let client = signed_in(&server, "root").await?;

    let departments = client.departments().list().await?;
    assert_eq!(departments.len(), 2);
    assert_eq!(departments[0].description, "");
    assert_eq!(departments[1].status, "");

    let form = CodedForm { code: "LAB".into(), name: "Laboratory".into(), ..Default::default() };
    client.departments().create(&form).await?;
    let call = server.state.requests_to("/api/departments").pop().expect("create call");
    assert_eq!(call.method, "POST");
    assert_eq!(call.body["id"], 0);
    assert_eq!(call.body["status"], "ACTIVE");
    assert_eq!(call.body["createdBy"], "root");
    assert_eq!(call.body["updatedBy"], "root");

    let existing = &departments[0];
    let edit = CodedForm { name: "People".into(), ..CodedForm::from(existing) };
    client.departments().update(existing, &edit).await?;
    let call = server.state.requests_to("/api/departments/1").pop().expect("update call");
    assert_eq!(call.method, "PUT");
    assert_eq!(call.body["name"], "People");
    assert_eq!(call.body["createdBy"], "ruth");
    assert_eq!(call.body["updatedBy"], "root");
    assert_eq!(call.body["createdAt"], "2024-01-01T00:00:00.000Z");

    let titles = client.job_titles().list().await?;
    assert_eq!(titles[0].name, "Nurse");
    client.job_titles().create(&CodedForm { code: "DOC".into(), name: "Doctor".into(), ..Default::default() }).await?;
    assert_eq!(server.state.requests_to("/api/job-titles").iter().filter(|r| r.method == "POST").count(), 1);
    Ok(())
}

#[tokio::test]
async fn positions_sort_by_display_order() -> Result<()> {
    let server = common::spawn_backend().await?;
    let client = signed_in(&server, "root").await?;

    let positions = client.positions().list().await?;
    let names: Vec<&str> = positions.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Intern", "Deputy", "Lead"]);

    let form = PositionForm { name: "Chief".into(), display_order: " 4 ".into(), ..Default::default() };
    client.positions().create(&form).await?;
    let call = server.state.requests_to("/api/positions").pop().expect("create call");
    assert_eq!(call.body["displayOrder"], 4);
    assert_eq!(call.body["isActive"], true);

    let deputy = &positions[1];
    let edit = PositionForm { description: "Second in line".into(), ..PositionForm::from(deputy) };
    client.positions().update(deputy.id, &edit).await?;
    let call = server.state.requests_to("/api/positions/2").pop().expect("update call");
    assert_eq!(call.body["id"], 2);
    assert_eq!(call.body["displayOrder"], 1);
    assert_eq!(call.body["description"], "Second in line");
    Ok(())
}

#[tokio::test]
async fn equipment_type_filter_narrows_the_page() -> Result<()> {
    let server = common::spawn_backend().await?;
    let client = signed_in(&server, "root").await?;

    let request = PageRequest::new("equipmentType");
    let page = client.equipments().list(&request, Some("LABORATORY_EQUIPMENT")).await?;
    assert_eq!(page.content.len(), 2);
    assert_eq!(page.total_elements, 3);
    let call = server.state.requests_to("/api/equipments").pop().expect("listing call");
    assert_eq!(call.query["sortBy"], "equipmentType");
    assert_eq!(call.query["page"], "0");

    assert_eq!(client.equipments().types().await.len(), 2);

    let all = client.equipments().list(&request, None).await?;
    let xray = &all.content[1];
    let form = EquipmentForm { equipment_name: "X-Ray 2".into(), equipment_type: xray.equipment_type.clone() };
    client.equipments().update(xray, &form).await?;
    let call = server.state.requests_to("/api/equipments/2").pop().expect("update call");
    assert_eq!(call.body["equipmentName"], "X-Ray 2");
    assert_eq!(call.body["createdAt"], "2024-02-02T00:00:00.000Z");

    client.equipments().create(&EquipmentForm { equipment_type: "ANESTHESIA".into(), equipment_name: "Mask".into() }).await?;
    assert!(server.state.requests_to("/api/equipments").iter().any(|r| r.method == "POST"));
    Ok(())
}

#[tokio::test]
async fn center_writes_carry_district_and_parent_names() -> Result<()> {
    let server = common::spawn_backend().await?;
    let client = signed_in(&server, "root").await?;

    let districts = client.districts().list().await?;
    assert_eq!(districts[1].code, None);
    assert_eq!(client.districts().top_level_centers().await?.len(), 1);

    let form = HealthCenterForm {
        name: "Post".into(),
        code: "P1".into(),
        district_id: Some(2),
        parent_center_id: Some(8),
        ..Default::default()
    };
    client.districts().create_center(&form).await?;
    let call = server.state.requests_to("/api/health-centers").pop().expect("create call");
    assert_eq!(call.method, "POST");
    assert_eq!(call.body["districtName"], "North");
    assert_eq!(call.body["parentCenterName"], "Clinic");
    assert_eq!(call.body["createdBy"], "root");

    // A partial edit keeps every field it does not name
    let existing = client.districts().center(8).await?;
    let edit = read_form_over(&HealthCenterForm::from(&existing), Some(r#"{"name": "Clinic East"}"#.to_string()))?;
    client.districts().update_center(8, &edit).await?;
    let call = server.state.requests_to("/api/health-centers/8").pop().expect("update call");
    assert_eq!(call.body["name"], "Clinic East");
    assert_eq!(call.body["type"], "CLINIC");
    assert_eq!(call.body["status"], "INACTIVE");
    assert_eq!(call.body["parentCenterId"], 1);
    assert_eq!(call.body["parentCenterName"], "General");

    let missing = client.districts().center(99).await.unwrap_err();
    assert_eq!(missing.status_code(), Some(404));
    Ok(())
}
