use serde_json::{json, Value};

use crate::client::ApiClient;
use crate::errors::GatewayError;
use crate::normalize::normalize_date_field;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    List,
    Create,
}

struct ToolSpec {
    name: &'static str,
    description: &'static str,
    kind: Kind,
    path: &'static str,
    /// Accepted arguments. For list tools these are also the only keys
    /// forwarded as query parameters; create bodies pass through whole.
    params: &'static [&'static str],
    /// Date-valued arguments, truncated to their calendar date before
    /// forwarding.
    date_params: &'static [&'static str],
}

const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "list_departments",
        description: "List registered departments",
        kind: Kind::List,
        path: "/departments",
        params: &["limit", "offset"],
        date_params: &[],
    },
    ToolSpec {
        name: "create_department",
        description: "Create a department",
        kind: Kind::Create,
        path: "/departments",
        params: &["name", "cost_center"],
        date_params: &[],
    },
    ToolSpec {
        name: "list_employees",
        description: "List employees, optionally by department or active flag",
        kind: Kind::List,
        path: "/employees",
        params: &["limit", "offset", "department_id", "active"],
        date_params: &[],
    },
    ToolSpec {
        name: "create_employee",
        description: "Create an employee",
        kind: Kind::Create,
        path: "/employees",
        params: &[
            "department_id",
            "full_name",
            "email",
            "role",
            "salary_cents",
            "hired_on",
            "active",
        ],
        date_params: &["hired_on"],
    },
    ToolSpec {
        name: "list_suppliers",
        description: "List registered suppliers",
        kind: Kind::List,
        path: "/suppliers",
        params: &["limit", "offset"],
        date_params: &[],
    },
    ToolSpec {
        name: "create_supplier",
        description: "Create a supplier",
        kind: Kind::Create,
        path: "/suppliers",
        params: &["name", "tax_id", "email", "phone"],
        date_params: &[],
    },
    ToolSpec {
        name: "list_purchase_orders",
        description: "List purchase orders, optionally by status",
        kind: Kind::List,
        path: "/purchase-orders",
        params: &["limit", "offset", "status"],
        date_params: &[],
    },
    ToolSpec {
        name: "create_purchase_order",
        description: "Create a purchase order",
        kind: Kind::Create,
        path: "/purchase-orders",
        params: &[
            "supplier_id",
            "requested_by",
            "department_id",
            "status",
            "total_cents",
        ],
        date_params: &[],
    },
    ToolSpec {
        name: "list_invoices",
        description: "List invoices, optionally by status or supplier",
        kind: Kind::List,
        path: "/invoices",
        params: &["limit", "offset", "status", "supplier_id"],
        date_params: &[],
    },
    ToolSpec {
        name: "create_invoice",
        description: "Create an invoice",
        kind: Kind::Create,
        path: "/invoices",
        params: &[
            "supplier_id",
            "po_id",
            "invoice_no",
            "issued_on",
            "due_on",
            "amount_cents",
            "status",
        ],
        date_params: &["issued_on", "due_on"],
    },
    ToolSpec {
        name: "list_payments",
        description: "List payments, optionally by invoice",
        kind: Kind::List,
        path: "/payments",
        params: &["limit", "offset", "invoice_id"],
        date_params: &[],
    },
    ToolSpec {
        name: "create_payment",
        description: "Record a payment against an invoice",
        kind: Kind::Create,
        path: "/payments",
        params: &["invoice_id", "paid_on", "amount_cents", "method", "reference"],
        date_params: &["paid_on"],
    },
];

/// Tool catalog as served by `GET /tools`
pub fn catalog() -> Value {
    let tools: Vec<Value> = TOOLS
        .iter()
        .map(|t| {
            json!({
                "name": t.name,
                "description": t.description,
                "params": t.params,
            })
        })
        .collect();
    json!({ "tools": tools })
}

/// Forward a tool call to the API
pub async fn dispatch(
    client: &ApiClient,
    name: &str,
    args: Value,
) -> Result<Value, GatewayError> {
    let spec = TOOLS
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| GatewayError::UnknownTool(name.to_string()))?;

    match spec.kind {
        Kind::List => client.get(spec.path, &query_args(&args, spec.params)).await,
        Kind::Create => {
            let mut map = object_args(args)?;
            for field in spec.date_params {
                normalize_date_field(&mut map, field);
            }
            client.post(spec.path, &Value::Object(map)).await
        }
    }
}

fn object_args(args: Value) -> Result<serde_json::Map<String, Value>, GatewayError> {
    match args {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(serde_json::Map::new()),
        _ => Err(GatewayError::BadArguments(
            "tool arguments must be a JSON object".to_string(),
        )),
    }
}

fn query_args(args: &Value, allowed: &[&str]) -> Vec<(String, String)> {
    let mut query = Vec::new();
    if let Value::Object(map) = args {
        for key in allowed {
            match map.get(*key) {
                None | Some(Value::Null) => {}
                Some(Value::String(s)) => query.push((key.to_string(), s.clone())),
                Some(other) => query.push((key.to_string(), other.to_string())),
            }
        }
    }
    query
}
