//! Testes de integração do ciclo de vida da ordem de serviço:
//! criação com defaults, tabela de transições, rollups e sub-recursos.

mod common;

use axum::http::StatusCode;
use common::{create_work_order, TestApp};
use serde_json::json;

#[tokio::test]
async fn criar_e_buscar_devolve_campos_enviados_mais_defaults() {
    let app = TestApp::spawn();

    let created = create_work_order(&app, "Renovação do 3º andar").await;
    let id = created["id"].as_str().expect("id ausente");

    assert_eq!(created["details"]["status"], "pending");
    assert_eq!(created["details"]["priority"], "medium");
    assert_eq!(created["details"]["completionPercentage"], 0);
    assert!(created["details"]["workOrderNumber"]
        .as_str()
        .unwrap()
        .starts_with("WO-"));

    let (status, fetched) = app.get(&format!("/api/work-orders/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["details"]["title"], "Renovação do 3º andar");
    assert_eq!(fetched["details"]["client"], "Acme Corporation");
    assert_eq!(fetched["items"], json!([]));
}

#[tokio::test]
async fn criacao_sem_titulo_retorna_erro_de_validacao() {
    let app = TestApp::spawn();
    let (status, body) = app.post("/api/work-orders", json!({ "title": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["title"].is_array(), "corpo: {}", body);
}

#[tokio::test]
async fn ciclo_completo_e_transicao_proibida() {
    let app = TestApp::spawn();
    let created = create_work_order(&app, "Ciclo").await;
    let id = created["id"].as_str().unwrap();
    let status_path = format!("/api/work-orders/{}/status", id);

    let (status, _) = app
        .post(&status_path, json!({ "status": "in-progress" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(&status_path, json!({ "status": "completed", "reason": "entregue" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    // Concluir força o percentual em 100.
    assert_eq!(body["details"]["completionPercentage"], 100);

    // Não existe aresta Completed -> Pending.
    let (status, body) = app.post(&status_path, json!({ "status": "pending" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["fromStatus"], "completed");
    assert_eq!(body["toStatus"], "pending");

    // E o status permanece o que era.
    let (_, fetched) = app.get(&format!("/api/work-orders/{}", id)).await;
    assert_eq!(fetched["details"]["status"], "completed");
}

#[tokio::test]
async fn transicao_registra_auditoria() {
    let app = TestApp::spawn();
    let created = create_work_order(&app, "Auditoria").await;
    let id = created["id"].as_str().unwrap();

    app.post(
        &format!("/api/work-orders/{}/status", id),
        json!({ "status": "in-progress", "reason": "equipe alocada" }),
    )
    .await;

    let (status, log) = app.get(&format!("/api/work-orders/{}/activity", id)).await;
    assert_eq!(status, StatusCode::OK);
    let entries = log.as_array().unwrap();
    assert!(entries.iter().any(|entry| {
        let description = entry["description"].as_str().unwrap_or_default();
        description.contains("Pending")
            && description.contains("In Progress")
            && description.contains("equipe alocada")
    }));
}

#[tokio::test]
async fn ordem_desconhecida_retorna_404() {
    let app = TestApp::spawn();
    let missing = "00000000-0000-0000-0000-000000000000";

    let (status, _) = app.get(&format!("/api/work-orders/{}", missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post(
            &format!("/api/work-orders/{}/status", missing),
            json!({ "status": "in-progress" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&format!("/api/work-orders/{}", missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn atualizacao_mescla_detalhes_sem_perder_o_resto() {
    let app = TestApp::spawn();
    let created = create_work_order(&app, "Merge").await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = app
        .put(
            &format!("/api/work-orders/{}", id),
            json!({
                "details": { "title": "Novo título", "completionPercentage": 40 },
                "expenseBreakdown": { "materials": 200.0, "labor": 300.0, "other": 50.0 }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["details"]["title"], "Novo título");
    assert_eq!(updated["details"]["completionPercentage"], 40);
    // Campo não enviado continua intacto.
    assert_eq!(updated["details"]["client"], "Acme Corporation");
    assert_eq!(updated["expenseBreakdown"]["labor"], 300.0);
}

#[tokio::test]
async fn resumo_calcula_despesa_total_e_faixa_de_progresso() {
    let app = TestApp::spawn();
    let created = create_work_order(&app, "Resumo").await;
    let id = created["id"].as_str().unwrap();

    app.put(
        &format!("/api/work-orders/{}", id),
        json!({
            "details": { "completionPercentage": 50 },
            "expenses": [
                {
                    "id": "11111111-1111-1111-1111-111111111111",
                    "description": "Tubos",
                    "amount": 100.5,
                    "currency": "SAR",
                    "category": "materials",
                    "date": "2026-08-01T00:00:00Z",
                    "submittedBy": "eng.silva",
                    "status": "approved"
                },
                {
                    "id": "22222222-2222-2222-2222-222222222222",
                    "description": "Mão de obra",
                    "amount": 49.5,
                    "currency": "SAR",
                    "category": "labor",
                    "date": "2026-08-02T00:00:00Z",
                    "submittedBy": "eng.silva",
                    "status": "pending"
                }
            ]
        }),
    )
    .await;

    let (status, summary) = app.get(&format!("/api/work-orders/{}/summary", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totalExpense"], 150.0);
    // 50% fica na faixa intermediária com os limites default (30/70).
    assert_eq!(summary["progressBucket"], "caution");
    assert_eq!(summary["actionsCount"], 0);
}

#[tokio::test]
async fn observacoes_crud_por_id() {
    let app = TestApp::spawn();
    let created = create_work_order(&app, "Observações").await;
    let id = created["id"].as_str().unwrap();

    let (status, with_remark) = app
        .post(
            &format!("/api/work-orders/{}/remarks", id),
            json!({ "content": "verificar válvula", "type": "technical" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let remark_id = with_remark["remarks"][0]["id"].as_str().unwrap().to_string();

    let (status, updated) = app
        .put(
            &format!("/api/work-orders/{}/remarks/{}", id, remark_id),
            json!({ "content": "válvula substituída" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["remarks"][0]["content"], "válvula substituída");
    assert_eq!(updated["remarks"][0]["type"], "technical");

    // Observação inexistente: 404.
    let (status, _) = app
        .put(
            &format!(
                "/api/work-orders/{}/remarks/00000000-0000-0000-0000-000000000000",
                id
            ),
            json!({ "content": "x" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, after_delete) = app
        .delete(&format!("/api/work-orders/{}/remarks/{}", id, remark_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after_delete["remarks"], json!([]));
}

#[tokio::test]
async fn tarefas_crud_por_id() {
    let app = TestApp::spawn();
    let created = create_work_order(&app, "Tarefas").await;
    let id = created["id"].as_str().unwrap();

    let (status, with_task) = app
        .post(
            &format!("/api/work-orders/{}/tasks", id),
            json!({ "title": "Preparar o canteiro", "priority": "high" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let task = &with_task["tasks"][0];
    assert_eq!(task["status"], "pending");
    assert_eq!(task["completed"], false);
    let task_id = task["id"].as_str().unwrap().to_string();

    let (status, updated) = app
        .put(
            &format!("/api/work-orders/{}/tasks/{}", id, task_id),
            json!({ "status": "in-progress", "completed": false }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["tasks"][0]["status"], "in-progress");

    let (status, _) = app
        .delete(&format!(
            "/api/work-orders/{}/tasks/00000000-0000-0000-0000-000000000000",
            id
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalogo_de_status_expoe_a_tabela_de_transicoes() {
    let app = TestApp::spawn();
    let (status, catalog) = app.get("/api/work-order-statuses").await;
    assert_eq!(status, StatusCode::OK);

    let entries = catalog.as_array().unwrap();
    let pending = entries
        .iter()
        .find(|entry| entry["code"] == "pending")
        .expect("pending ausente");
    assert_eq!(pending["name"], "Pending");
    assert_eq!(
        pending["allowedTransitions"],
        json!(["in-progress", "cancelled"])
    );

    // Os status legados são terminais.
    let legacy = entries
        .iter()
        .find(|entry| entry["code"] == "waiting-shutdown")
        .expect("status legado ausente");
    assert_eq!(legacy["allowedTransitions"], json!([]));
}

#[tokio::test]
async fn delete_remove_da_listagem() {
    let app = TestApp::spawn();
    let created = create_work_order(&app, "Apagar").await;
    let id = created["id"].as_str().unwrap();

    let (status, deleted) = app.delete(&format!("/api/work-orders/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!(true));

    let (_, list) = app.get("/api/work-orders").await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}
