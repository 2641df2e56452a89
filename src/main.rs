//src/main.rs

use tokio::net::TcpListener;

use fieldops_backend::{app, config::AppState};

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não
    // deve iniciar.
    let app_state = AppState::new().expect("Falha ao inicializar o estado da aplicação.");

    // Os stores notificam de forma síncrona; aqui a notificação vira
    // log estruturado (a UI que assinava os observables ficou de fora).
    app_state.work_order_repo.subscribe(|event| {
        tracing::info!(
            "store event: {:?} {} {}",
            event.kind,
            event.entity_type,
            event.entity_id
        );
    });
    app_state.material_repo.subscribe(|event| {
        tracing::info!(
            "store event: {:?} {} {}",
            event.kind,
            event.entity_type,
            event.entity_id
        );
    });
    app_state.requisition_repo.subscribe(|event| {
        tracing::info!(
            "store event: {:?} {} {}",
            event.kind,
            event.entity_type,
            event.entity_id
        );
    });

    let addr = app_state.bind_addr.clone();
    let router = app(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, router)
        .await
        .expect("Erro no servidor Axum");
}
