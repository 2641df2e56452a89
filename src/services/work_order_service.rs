// src/services/work_order_service.rs

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    handlers::work_orders::{
        AddRemarkPayload, AddTaskPayload, AssignMaterialPayload, CreateWorkOrderPayload,
        UpdateAssignmentPayload, UpdateRemarkPayload, UpdateTaskPayload, UpdateWorkOrderPayload,
    },
    models::activity::ActivityLogEntry,
    models::work_order::{
        ExpenseBreakdown, MaterialAssignment, ProgressThresholds, RemarkKind, TaskStatus,
        WorkOrder, WorkOrderDetails, WorkOrderPriority, WorkOrderRemark, WorkOrderStatus,
        WorkOrderSummary, WorkOrderTask,
    },
    store::{ActivityLogRepository, DocumentSequences, MaterialRepository, WorkOrderRepository},
};

#[derive(Clone)]
pub struct WorkOrderService {
    repo: WorkOrderRepository,
    material_repo: MaterialRepository,
    activity_log: ActivityLogRepository,
    sequences: DocumentSequences,
    thresholds: ProgressThresholds,
}

impl WorkOrderService {
    pub fn new(
        repo: WorkOrderRepository,
        material_repo: MaterialRepository,
        activity_log: ActivityLogRepository,
        sequences: DocumentSequences,
        thresholds: ProgressThresholds,
    ) -> Self {
        Self {
            repo,
            material_repo,
            activity_log,
            sequences,
            thresholds,
        }
    }

    // --- CRUD ---

    pub fn list(&self) -> Vec<WorkOrder> {
        self.repo.get_all()
    }

    pub fn get(&self, id: Uuid) -> Result<WorkOrder, AppError> {
        self.repo.get_by_id(id)
    }

    // Cria a ordem com os defaults documentados: status pendente,
    // prioridade média, numeração gerada e sub-coleções vazias.
    pub fn create(&self, payload: CreateWorkOrderPayload) -> WorkOrder {
        let now = Utc::now();
        let (work_order_number, internal_order_number) =
            self.sequences.next_work_order_numbers(now);

        let order = WorkOrder {
            id: Uuid::new_v4(),
            details: WorkOrderDetails {
                work_order_number,
                internal_order_number,
                title: payload.title,
                description: payload.description,
                client: payload.client,
                location: payload.location,
                status: payload.status.unwrap_or(WorkOrderStatus::Pending),
                priority: payload.priority.unwrap_or(WorkOrderPriority::Medium),
                category: payload.category,
                completion_percentage: payload.completion_percentage.unwrap_or(0),
                received_date: payload.received_date.unwrap_or(now),
                start_date: payload.start_date.unwrap_or(now),
                due_date: payload.due_date.unwrap_or(now + Duration::days(30)),
                target_end_date: payload
                    .target_end_date
                    .or(Some(now + Duration::days(30))),
                created_date: now,
                created_by: payload.created_by.unwrap_or_else(|| "System".to_string()),
                last_updated: None,
            },
            items: vec![],
            remarks: vec![],
            issues: vec![],
            materials: vec![],
            tasks: vec![],
            actions: vec![],
            actions_needed: None,
            photos: vec![],
            forms: vec![],
            expenses: vec![],
            invoices: vec![],
            expense_breakdown: ExpenseBreakdown::default(),
        };

        let order = self.repo.insert(order);
        self.activity_log.append(
            "workOrder",
            order.id,
            "create",
            format!("Work order {} created", order.details.work_order_number),
            "system",
        );
        order
    }

    // Merge raso das coleções e merge profundo de `details`. O status
    // não passa por aqui: só muda pela transição validada.
    pub fn update(&self, id: Uuid, payload: UpdateWorkOrderPayload) -> Result<WorkOrder, AppError> {
        self.repo.update_with(id, |order| {
            if let Some(details) = payload.details {
                let d = &mut order.details;
                if let Some(title) = details.title {
                    d.title = title;
                }
                if let Some(description) = details.description {
                    d.description = description;
                }
                if let Some(client) = details.client {
                    d.client = client;
                }
                if let Some(location) = details.location {
                    d.location = location;
                }
                if let Some(category) = details.category {
                    d.category = category;
                }
                if let Some(priority) = details.priority {
                    d.priority = priority;
                }
                if let Some(pct) = details.completion_percentage {
                    d.completion_percentage = pct;
                }
                if let Some(received) = details.received_date {
                    d.received_date = received;
                }
                if let Some(start) = details.start_date {
                    d.start_date = start;
                }
                if let Some(due) = details.due_date {
                    d.due_date = due;
                }
                if let Some(target) = details.target_end_date {
                    d.target_end_date = Some(target);
                }
            }

            if let Some(items) = payload.items {
                order.items = items;
            }
            if let Some(issues) = payload.issues {
                order.issues = issues;
            }
            if let Some(actions) = payload.actions {
                order.actions = actions;
            }
            if let Some(actions_needed) = payload.actions_needed {
                order.actions_needed = Some(actions_needed);
            }
            if let Some(photos) = payload.photos {
                order.photos = photos;
            }
            if let Some(forms) = payload.forms {
                order.forms = forms;
            }
            if let Some(expenses) = payload.expenses {
                order.expenses = expenses;
            }
            if let Some(invoices) = payload.invoices {
                order.invoices = invoices;
            }
            if let Some(breakdown) = payload.expense_breakdown {
                order.expense_breakdown = breakdown;
            }
        })
    }

    pub fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        self.repo.delete(id)
    }

    // --- Transição de Status ---

    pub fn update_status(
        &self,
        id: Uuid,
        new_status: WorkOrderStatus,
        reason: Option<&str>,
    ) -> Result<WorkOrder, AppError> {
        let mut previous = None;

        // A validação roda dentro do mesmo lock da mutação: a transição
        // é checada contra o status corrente, não contra um snapshot.
        let updated = self.repo.try_update_with(id, |order| {
            let current = order.details.status;
            if !current.can_transition_to(new_status) {
                return Err(AppError::InvalidStatusTransition {
                    from: current,
                    to: new_status,
                });
            }
            previous = Some(current);
            order.details.status = new_status;
            if new_status == WorkOrderStatus::Completed {
                order.details.completion_percentage = 100;
            }
            Ok(())
        })?;

        if let Some(previous) = previous {
            let mut description = format!(
                "Status changed from {} to {}",
                previous.display_name(),
                new_status.display_name()
            );
            if let Some(reason) = reason {
                description.push_str(&format!(" - Reason: {}", reason));
            }
            self.activity_log
                .append("workOrder", id, "update", description, "system");
        }

        Ok(updated)
    }

    pub fn update_priority(
        &self,
        id: Uuid,
        priority: WorkOrderPriority,
    ) -> Result<WorkOrder, AppError> {
        let updated = self.repo.update_with(id, |order| {
            order.details.priority = priority;
        })?;
        self.activity_log.append(
            "workOrder",
            id,
            "update",
            format!("Priority changed to {:?}", priority),
            "system",
        );
        Ok(updated)
    }

    // --- Rollups ---

    pub fn summary(&self, id: Uuid) -> Result<WorkOrderSummary, AppError> {
        let order = self.repo.get_by_id(id)?;
        Ok(WorkOrderSummary {
            id: order.id,
            work_order_number: order.details.work_order_number.clone(),
            status: order.details.status,
            total_expense: order.total_expense(),
            actions_count: order.actions_count(),
            progress_bucket: order.progress_bucket(self.thresholds),
            completion_percentage: order.details.completion_percentage,
        })
    }

    pub fn activity(&self, id: Uuid) -> Result<Vec<ActivityLogEntry>, AppError> {
        // Garante o 404 para ordem inexistente antes de filtrar o log.
        self.repo.get_by_id(id)?;
        Ok(self.activity_log.for_entity(id))
    }

    // --- Observações ---

    pub fn add_remark(&self, id: Uuid, payload: AddRemarkPayload) -> Result<WorkOrder, AppError> {
        let remark = WorkOrderRemark {
            id: Uuid::new_v4(),
            content: payload.content,
            kind: payload.kind.unwrap_or(RemarkKind::General),
            created_by: payload.created_by.unwrap_or_else(|| "System".to_string()),
            created_date: Utc::now(),
            people_involved: payload.people_involved.unwrap_or_default(),
        };
        self.repo.update_with(id, |order| {
            order.remarks.push(remark);
        })
    }

    pub fn update_remark(
        &self,
        id: Uuid,
        remark_id: Uuid,
        payload: UpdateRemarkPayload,
    ) -> Result<WorkOrder, AppError> {
        self.repo.try_update_with(id, |order| {
            let remark = order
                .remarks
                .iter_mut()
                .find(|remark| remark.id == remark_id)
                .ok_or(AppError::RemarkNotFound(remark_id))?;
            if let Some(content) = payload.content {
                remark.content = content;
            }
            if let Some(kind) = payload.kind {
                remark.kind = kind;
            }
            if let Some(people) = payload.people_involved {
                remark.people_involved = people;
            }
            Ok(())
        })
    }

    pub fn delete_remark(&self, id: Uuid, remark_id: Uuid) -> Result<WorkOrder, AppError> {
        self.repo.try_update_with(id, |order| {
            let index = order
                .remarks
                .iter()
                .position(|remark| remark.id == remark_id)
                .ok_or(AppError::RemarkNotFound(remark_id))?;
            order.remarks.remove(index);
            Ok(())
        })
    }

    // --- Tarefas ---
    // Endereçadas por id gerado; índice de array não entra na API.

    pub fn add_task(&self, id: Uuid, payload: AddTaskPayload) -> Result<WorkOrder, AppError> {
        let now = Utc::now();
        let task = WorkOrderTask {
            id: Uuid::new_v4(),
            title: payload.title,
            description: payload.description,
            status: payload.status.unwrap_or(TaskStatus::Pending),
            priority: payload.priority.unwrap_or(WorkOrderPriority::Medium),
            completed: false,
            start_date: Some(payload.start_date.unwrap_or(now)),
            due_date: Some(payload.due_date.unwrap_or(now + Duration::days(7))),
            created_date: now,
        };
        self.repo.update_with(id, |order| {
            order.tasks.push(task);
        })
    }

    pub fn update_task(
        &self,
        id: Uuid,
        task_id: Uuid,
        payload: UpdateTaskPayload,
    ) -> Result<WorkOrder, AppError> {
        self.repo.try_update_with(id, |order| {
            let task = order
                .tasks
                .iter_mut()
                .find(|task| task.id == task_id)
                .ok_or(AppError::TaskNotFound(task_id))?;
            if let Some(title) = payload.title {
                task.title = title;
            }
            if let Some(description) = payload.description {
                task.description = Some(description);
            }
            if let Some(status) = payload.status {
                task.status = status;
            }
            if let Some(priority) = payload.priority {
                task.priority = priority;
            }
            if let Some(completed) = payload.completed {
                task.completed = completed;
            }
            if let Some(start) = payload.start_date {
                task.start_date = Some(start);
            }
            if let Some(due) = payload.due_date {
                task.due_date = Some(due);
            }
            Ok(())
        })
    }

    pub fn delete_task(&self, id: Uuid, task_id: Uuid) -> Result<WorkOrder, AppError> {
        self.repo.try_update_with(id, |order| {
            let index = order
                .tasks
                .iter()
                .position(|task| task.id == task_id)
                .ok_or(AppError::TaskNotFound(task_id))?;
            order.tasks.remove(index);
            Ok(())
        })
    }

    // --- Materiais vinculados ---
    // Cada mutação de vínculo gera um lançamento na trilha de auditoria.

    pub fn assign_material(
        &self,
        id: Uuid,
        payload: AssignMaterialPayload,
    ) -> Result<WorkOrder, AppError> {
        let material = self.material_repo.get_by_id(payload.material_id)?;
        let assignment = MaterialAssignment {
            id: Uuid::new_v4(),
            material_id: material.id,
            description: material.description.clone(),
            quantity: payload.quantity,
            unit: material.unit.clone(),
            unit_cost: material.average_cost,
            assigned_date: Utc::now(),
            notes: payload.notes,
        };

        let updated = self.repo.update_with(id, |order| {
            order.materials.push(assignment);
        })?;

        self.activity_log.append(
            "workOrder",
            id,
            "update",
            format!(
                "Material {} assigned ({} {})",
                material.code, payload.quantity, material.unit
            ),
            "system",
        );
        Ok(updated)
    }

    pub fn update_material_assignment(
        &self,
        id: Uuid,
        assignment_id: Uuid,
        payload: UpdateAssignmentPayload,
    ) -> Result<WorkOrder, AppError> {
        let updated = self.repo.try_update_with(id, |order| {
            let assignment = order
                .materials
                .iter_mut()
                .find(|assignment| assignment.id == assignment_id)
                .ok_or(AppError::MaterialAssignmentNotFound(assignment_id))?;
            if let Some(quantity) = payload.quantity {
                assignment.quantity = quantity;
            }
            if let Some(notes) = payload.notes {
                assignment.notes = Some(notes);
            }
            Ok(())
        })?;

        self.activity_log.append(
            "workOrder",
            id,
            "update",
            format!("Material assignment {} updated", assignment_id),
            "system",
        );
        Ok(updated)
    }

    pub fn remove_material_assignment(
        &self,
        id: Uuid,
        assignment_id: Uuid,
    ) -> Result<WorkOrder, AppError> {
        let updated = self.repo.try_update_with(id, |order| {
            let index = order
                .materials
                .iter()
                .position(|assignment| assignment.id == assignment_id)
                .ok_or(AppError::MaterialAssignmentNotFound(assignment_id))?;
            order.materials.remove(index);
            Ok(())
        })?;

        self.activity_log.append(
            "workOrder",
            id,
            "update",
            format!("Material assignment {} removed", assignment_id),
            "system",
        );
        Ok(updated)
    }
}
