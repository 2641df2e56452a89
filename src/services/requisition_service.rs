// src/services/requisition_service.rs

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    handlers::requisitions::{
        ApproveRequisitionPayload, CancelRequisitionPayload, FulfillRequisitionPayload,
        RejectRequisitionPayload, SubmitRequisitionPayload,
    },
    models::material::RelatedEntity,
    models::requisition::{
        MaterialRequisition, RequisitionItem, RequisitionItemStatus, RequisitionStatus,
        RequisitionType, RequisitionUrgency,
    },
    services::inventory_service::InventoryService,
    store::{DocumentSequences, RequisitionRepository, WorkOrderRepository},
};

#[derive(Clone)]
pub struct RequisitionService {
    repo: RequisitionRepository,
    inventory_service: InventoryService,
    work_order_repo: WorkOrderRepository,
    sequences: DocumentSequences,
}

impl RequisitionService {
    pub fn new(
        repo: RequisitionRepository,
        inventory_service: InventoryService,
        work_order_repo: WorkOrderRepository,
        sequences: DocumentSequences,
    ) -> Self {
        Self {
            repo,
            inventory_service,
            work_order_repo,
            sequences,
        }
    }

    pub fn list(&self) -> Vec<MaterialRequisition> {
        self.repo.get_all()
    }

    pub fn get(&self, id: Uuid) -> Result<MaterialRequisition, AppError> {
        self.repo.get_by_id(id)
    }

    // --- Submissão ---
    // Sem aprovação exigida, a requisição já nasce aprovada com todos os
    // itens aprovados na quantidade pedida.

    pub fn submit(
        &self,
        payload: SubmitRequisitionPayload,
    ) -> Result<MaterialRequisition, AppError> {
        if payload.items.is_empty() {
            return Err(AppError::InvalidPayload(
                "A requisição precisa de ao menos um item.".to_string(),
            ));
        }

        let now = Utc::now();
        let approval_required = payload.approval_required.unwrap_or(true);
        let initial_status = if approval_required {
            RequisitionStatus::Pending
        } else {
            RequisitionStatus::Approved
        };
        let item_status = if approval_required {
            RequisitionItemStatus::Pending
        } else {
            RequisitionItemStatus::Approved
        };

        // Número da ordem resolvido pelo id, quando vinculada.
        let work_order_number = match payload.work_order_id {
            Some(work_order_id) => Some(
                self.work_order_repo
                    .get_by_id(work_order_id)?
                    .details
                    .work_order_number,
            ),
            None => None,
        };

        let mut items = Vec::with_capacity(payload.items.len());
        let mut total_estimated_cost = Decimal::ZERO;
        for item in payload.items {
            if item.requested_quantity <= Decimal::ZERO {
                return Err(AppError::InvalidPayload(
                    "A quantidade requisitada deve ser maior que zero.".to_string(),
                ));
            }
            let material = self.inventory_service.get_material(item.material_id)?;
            let estimated_cost = item.estimated_cost.or_else(|| {
                material
                    .average_cost
                    .map(|cost| cost * item.requested_quantity)
            });
            total_estimated_cost += estimated_cost.unwrap_or(Decimal::ZERO);

            let approved = if approval_required {
                None
            } else {
                Some(item.requested_quantity)
            };
            items.push(RequisitionItem {
                id: Uuid::new_v4(),
                material_id: material.id,
                material_code: material.code,
                material_description: material.description,
                requested_quantity: item.requested_quantity,
                approved_quantity: approved,
                fulfilled_quantity: None,
                remaining_quantity: approved,
                urgency: item.urgency.unwrap_or(RequisitionUrgency::Medium),
                status: item_status,
                notes: item.notes,
                estimated_cost,
            });
        }

        let requisition = MaterialRequisition {
            id: Uuid::new_v4(),
            request_number: self.sequences.next_requisition_number(now),
            request_type: payload.request_type.unwrap_or(RequisitionType::General),
            work_order_id: payload.work_order_id,
            work_order_number,
            requested_by: payload.requested_by,
            request_date: now,
            required_by: payload.required_by.unwrap_or(now + Duration::days(7)),
            status: initial_status,
            items,
            justification: payload.justification.unwrap_or_default(),
            total_estimated_cost,
            urgency: payload.urgency.unwrap_or(RequisitionUrgency::Medium),
            approval_required,
            approved_by: None,
            approved_date: None,
            notes: None,
        };

        Ok(self.repo.insert(requisition))
    }

    // --- Aprovação ---
    // Re-aprovar uma requisição já aprovada é permitido e idempotente:
    // as quantidades não mudam além do efeito da primeira aprovação.

    pub fn approve(
        &self,
        id: Uuid,
        payload: ApproveRequisitionPayload,
    ) -> Result<MaterialRequisition, AppError> {
        self.repo.try_update_with(id, |requisition| {
            if !requisition
                .status
                .can_transition_to(RequisitionStatus::Approved)
            {
                return Err(AppError::InvalidRequisitionTransition {
                    from: requisition.status,
                    to: RequisitionStatus::Approved,
                });
            }

            requisition.status = RequisitionStatus::Approved;
            requisition.approved_by = Some(payload.approved_by.clone());
            requisition.approved_date = Some(Utc::now());
            if let Some(notes) = &payload.notes {
                requisition.notes = Some(notes.clone());
            }
            for item in &mut requisition.items {
                item.status = RequisitionItemStatus::Approved;
                item.approved_quantity = Some(item.requested_quantity);
                item.remaining_quantity = Some(item.requested_quantity);
            }
            Ok(())
        })
    }

    pub fn reject(
        &self,
        id: Uuid,
        payload: RejectRequisitionPayload,
    ) -> Result<MaterialRequisition, AppError> {
        self.repo.try_update_with(id, |requisition| {
            if !requisition
                .status
                .can_transition_to(RequisitionStatus::Rejected)
            {
                return Err(AppError::InvalidRequisitionTransition {
                    from: requisition.status,
                    to: RequisitionStatus::Rejected,
                });
            }
            requisition.status = RequisitionStatus::Rejected;
            if let Some(reason) = &payload.reason {
                requisition.notes = Some(reason.clone());
            }
            for item in &mut requisition.items {
                item.status = RequisitionItemStatus::Rejected;
            }
            Ok(())
        })
    }

    // --- Atendimento ---
    // Baixa o estoque pelo caminho do inventário (uma movimentação de
    // saída por item, limitada pelo saldo) e reconcilia as quantidades
    // atendidas/restantes. Sem lista de itens no payload, atende tudo o
    // que resta.

    pub fn fulfill(
        &self,
        id: Uuid,
        payload: FulfillRequisitionPayload,
    ) -> Result<MaterialRequisition, AppError> {
        let requisition = self.repo.get_by_id(id)?;
        if !requisition
            .status
            .can_transition_to(RequisitionStatus::Fulfilled)
        {
            return Err(AppError::InvalidRequisitionTransition {
                from: requisition.status,
                to: RequisitionStatus::Fulfilled,
            });
        }

        let performed_by = payload
            .performed_by
            .unwrap_or_else(|| "system".to_string());

        // Plano de atendimento: (id do item, quantidade desejada).
        let wanted: Vec<(Uuid, Decimal)> = match payload.items {
            Some(items) => {
                let mut wanted = Vec::with_capacity(items.len());
                for entry in items {
                    let item = requisition
                        .items
                        .iter()
                        .find(|item| item.id == entry.item_id)
                        .ok_or_else(|| {
                            AppError::InvalidPayload(format!(
                                "Item {} não pertence à requisição.",
                                entry.item_id
                            ))
                        })?;
                    let remaining = item.remaining_quantity.unwrap_or(Decimal::ZERO);
                    wanted.push((item.id, entry.quantity.min(remaining)));
                }
                wanted
            }
            None => requisition
                .items
                .iter()
                .map(|item| (item.id, item.remaining_quantity.unwrap_or(Decimal::ZERO)))
                .collect(),
        };

        // Baixa no estoque, item a item.
        let mut issued: Vec<(Uuid, Decimal)> = Vec::with_capacity(wanted.len());
        for (item_id, quantity) in wanted {
            if quantity <= Decimal::ZERO {
                continue;
            }
            let item = requisition
                .items
                .iter()
                .find(|item| item.id == item_id)
                .ok_or(AppError::RequisitionNotFound(id))?;

            // Sem saldo nenhum, não grava movimentação zerada.
            let material = self.inventory_service.get_material(item.material_id)?;
            if material.total_stock <= Decimal::ZERO {
                continue;
            }

            let (_, _, actual) = self.inventory_service.issue_stock(
                item.material_id,
                quantity,
                &performed_by,
                Some(RelatedEntity {
                    kind: "requisition".to_string(),
                    id: requisition.id,
                    reference: requisition.request_number.clone(),
                }),
                Some(format!("Requisition {}", requisition.request_number)),
            )?;
            if actual > Decimal::ZERO {
                issued.push((item_id, actual));
            }
        }

        // Nada baixado (sem saldo em nenhum item): o status não muda.
        if issued.is_empty() {
            return self.repo.get_by_id(id);
        }

        // Reconcilia quantidades e fecha o status da requisição.
        self.repo.try_update_with(id, |requisition| {
            for (item_id, actual) in &issued {
                if let Some(item) = requisition.items.iter_mut().find(|item| item.id == *item_id)
                {
                    let fulfilled = item.fulfilled_quantity.unwrap_or(Decimal::ZERO) + *actual;
                    let remaining =
                        (item.remaining_quantity.unwrap_or(Decimal::ZERO) - *actual)
                            .max(Decimal::ZERO);
                    item.fulfilled_quantity = Some(fulfilled);
                    item.remaining_quantity = Some(remaining);
                    item.status = if remaining <= Decimal::ZERO {
                        RequisitionItemStatus::Fulfilled
                    } else {
                        RequisitionItemStatus::PartiallyFulfilled
                    };
                }
            }

            let all_done = requisition
                .items
                .iter()
                .all(|item| item.remaining_quantity.unwrap_or(Decimal::ZERO) <= Decimal::ZERO);
            requisition.status = if all_done {
                RequisitionStatus::Fulfilled
            } else {
                RequisitionStatus::PartiallyFulfilled
            };
            Ok(())
        })
    }

    pub fn cancel(
        &self,
        id: Uuid,
        payload: CancelRequisitionPayload,
    ) -> Result<MaterialRequisition, AppError> {
        self.repo.try_update_with(id, |requisition| {
            if !requisition
                .status
                .can_transition_to(RequisitionStatus::Cancelled)
            {
                return Err(AppError::InvalidRequisitionTransition {
                    from: requisition.status,
                    to: RequisitionStatus::Cancelled,
                });
            }
            requisition.status = RequisitionStatus::Cancelled;
            if let Some(reason) = &payload.reason {
                requisition.notes = Some(reason.clone());
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::materials::CreateMaterialPayload;
    use crate::handlers::requisitions::{FulfillItemPayload, RequisitionItemPayload};
    use crate::models::material::MaterialType;
    use crate::store::MaterialRepository;

    struct Fixture {
        service: RequisitionService,
        inventory: InventoryService,
    }

    fn fixture() -> Fixture {
        let sequences = DocumentSequences::new();
        let inventory =
            InventoryService::new(MaterialRepository::new(), sequences.clone());
        let service = RequisitionService::new(
            RequisitionRepository::new(),
            inventory.clone(),
            WorkOrderRepository::new(),
            sequences,
        );
        Fixture { service, inventory }
    }

    fn seed_material(inventory: &InventoryService, code: &str, total: &str) -> Uuid {
        inventory
            .create_material(CreateMaterialPayload {
                code: code.to_string(),
                description: format!("Material {}", code),
                unit: "un".to_string(),
                material_type: MaterialType::Purchasable,
                client_type: None,
                attributes: None,
                total_stock: Some(total.parse().unwrap()),
                reserved_stock: None,
                minimum_stock: None,
                maximum_stock: None,
                reorder_point: None,
                average_cost: Some("3.00".parse().unwrap()),
            })
            .id
    }

    fn submit_payload(material_id: Uuid, quantity: &str, approval: bool) -> SubmitRequisitionPayload {
        SubmitRequisitionPayload {
            request_type: None,
            work_order_id: None,
            requested_by: "tests".to_string(),
            required_by: None,
            items: vec![RequisitionItemPayload {
                material_id,
                requested_quantity: quantity.parse().unwrap(),
                urgency: None,
                notes: None,
                estimated_cost: None,
            }],
            justification: None,
            urgency: None,
            approval_required: Some(approval),
        }
    }

    #[test]
    fn sem_aprovacao_exigida_ja_nasce_aprovada() {
        let fx = fixture();
        let material_id = seed_material(&fx.inventory, "REQ-A", "50");

        let requisition = fx
            .service
            .submit(submit_payload(material_id, "20", false))
            .unwrap();

        assert_eq!(requisition.status, RequisitionStatus::Approved);
        for item in &requisition.items {
            assert_eq!(item.status, RequisitionItemStatus::Approved);
            assert_eq!(item.approved_quantity, Some(item.requested_quantity));
        }
        // Custo estimado derivado do custo médio do catálogo.
        assert_eq!(requisition.total_estimated_cost, "60".parse().unwrap());
    }

    #[test]
    fn aprovacao_dupla_e_idempotente() {
        let fx = fixture();
        let material_id = seed_material(&fx.inventory, "REQ-B", "50");
        let requisition = fx
            .service
            .submit(submit_payload(material_id, "20", true))
            .unwrap();
        assert_eq!(requisition.status, RequisitionStatus::Pending);

        let approve = || {
            fx.service
                .approve(
                    requisition.id,
                    ApproveRequisitionPayload {
                        approved_by: "chefe".to_string(),
                        notes: None,
                    },
                )
                .unwrap()
        };
        let first = approve();
        let second = approve();

        assert_eq!(second.status, RequisitionStatus::Approved);
        assert_eq!(
            first.items[0].approved_quantity,
            second.items[0].approved_quantity
        );
    }

    #[test]
    fn aprovar_requisicao_desconhecida_retorna_not_found() {
        let fx = fixture();
        let result = fx.service.approve(
            Uuid::new_v4(),
            ApproveRequisitionPayload {
                approved_by: "chefe".to_string(),
                notes: None,
            },
        );
        assert!(matches!(result, Err(AppError::RequisitionNotFound(_))));
    }

    #[test]
    fn rejeitada_nao_pode_ser_aprovada() {
        let fx = fixture();
        let material_id = seed_material(&fx.inventory, "REQ-C", "50");
        let requisition = fx
            .service
            .submit(submit_payload(material_id, "20", true))
            .unwrap();

        fx.service
            .reject(
                requisition.id,
                RejectRequisitionPayload {
                    rejected_by: "chefe".to_string(),
                    reason: Some("sem orçamento".to_string()),
                },
            )
            .unwrap();

        let result = fx.service.approve(
            requisition.id,
            ApproveRequisitionPayload {
                approved_by: "chefe".to_string(),
                notes: None,
            },
        );
        assert!(matches!(
            result,
            Err(AppError::InvalidRequisitionTransition { .. })
        ));
    }

    #[test]
    fn submissao_sem_itens_e_invalida() {
        let fx = fixture();
        let mut payload = submit_payload(Uuid::new_v4(), "1", true);
        payload.items.clear();
        assert!(matches!(
            fx.service.submit(payload),
            Err(AppError::InvalidPayload(_))
        ));
    }

    #[test]
    fn atendimento_total_baixa_o_estoque_e_fecha_a_requisicao() {
        let fx = fixture();
        let material_id = seed_material(&fx.inventory, "REQ-D", "50");
        let requisition = fx
            .service
            .submit(submit_payload(material_id, "20", false))
            .unwrap();

        let fulfilled = fx
            .service
            .fulfill(
                requisition.id,
                FulfillRequisitionPayload {
                    performed_by: Some("almoxarife".to_string()),
                    items: None,
                },
            )
            .unwrap();

        assert_eq!(fulfilled.status, RequisitionStatus::Fulfilled);
        assert_eq!(
            fulfilled.items[0].fulfilled_quantity,
            Some("20".parse().unwrap())
        );
        assert_eq!(
            fx.inventory.get_material(material_id).unwrap().total_stock,
            "30".parse().unwrap()
        );
        // Uma movimentação de saída vinculada à requisição.
        let movements = fx.inventory.movements();
        assert_eq!(movements.len(), 1);
        assert_eq!(
            movements[0].related_entity.as_ref().unwrap().reference,
            requisition.request_number
        );
    }

    #[test]
    fn atendimento_parcial_quando_o_saldo_nao_cobre() {
        let fx = fixture();
        let material_id = seed_material(&fx.inventory, "REQ-E", "8");
        let requisition = fx
            .service
            .submit(submit_payload(material_id, "20", false))
            .unwrap();
        let item_id = requisition.items[0].id;

        let fulfilled = fx
            .service
            .fulfill(
                requisition.id,
                FulfillRequisitionPayload {
                    performed_by: None,
                    items: Some(vec![FulfillItemPayload {
                        item_id,
                        quantity: "20".parse().unwrap(),
                    }]),
                },
            )
            .unwrap();

        assert_eq!(fulfilled.status, RequisitionStatus::PartiallyFulfilled);
        assert_eq!(
            fulfilled.items[0].fulfilled_quantity,
            Some("8".parse().unwrap())
        );
        assert_eq!(
            fulfilled.items[0].remaining_quantity,
            Some("12".parse().unwrap())
        );
        assert_eq!(
            fx.inventory.get_material(material_id).unwrap().total_stock,
            Decimal::ZERO
        );
    }

    #[test]
    fn numeracao_e_crescente() {
        let fx = fixture();
        let material_id = seed_material(&fx.inventory, "REQ-F", "50");
        let first = fx
            .service
            .submit(submit_payload(material_id, "1", true))
            .unwrap();
        let second = fx
            .service
            .submit(submit_payload(material_id, "1", true))
            .unwrap();
        assert!(second.request_number > first.request_number);
    }
}
