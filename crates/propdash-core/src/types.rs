//! Basic enumerations shared by records and filters

use serde::{Deserialize, Serialize};

/// Record domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Stored files: leases, receipts, inspection reports
    Document,
    /// Income or expense ledger line
    Transaction,
    /// Rent payment owed by a tenant
    Payment,
    /// Maintenance and operating costs
    Expense,
    /// Tenant or property review
    Review,
}

impl std::str::FromStr for Domain {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "document" | "documents" => Ok(Domain::Document),
            "transaction" | "transactions" => Ok(Domain::Transaction),
            "payment" | "payments" => Ok(Domain::Payment),
            "expense" | "expenses" => Ok(Domain::Expense),
            "review" | "reviews" => Ok(Domain::Review),
            _ => Err(format!("Invalid record domain: {}", s)),
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Domain::Document => write!(f, "document"),
            Domain::Transaction => write!(f, "transaction"),
            Domain::Payment => write!(f, "payment"),
            Domain::Expense => write!(f, "expense"),
            Domain::Review => write!(f, "review"),
        }
    }
}

/// Direction of money for transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    Income,
    Expense,
}

impl std::str::FromStr for Flow {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Flow::Income),
            "expense" | "expenses" => Ok(Flow::Expense),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Flow::Income => write!(f, "income"),
            Flow::Expense => write!(f, "expense"),
        }
    }
}

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Overdue,
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paid" | "completed" => Ok(PaymentStatus::Paid),
            "pending" => Ok(PaymentStatus::Pending),
            "overdue" | "late" => Ok(PaymentStatus::Overdue),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Overdue => write!(f, "overdue"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_from_str() {
        assert_eq!("Documents".parse::<Domain>().unwrap(), Domain::Document);
        assert_eq!("payment".parse::<Domain>().unwrap(), Domain::Payment);
        assert!("lease".parse::<Domain>().is_err());
    }

    #[test]
    fn test_flow_round_trip() {
        for flow in [Flow::Income, Flow::Expense] {
            assert_eq!(flow.to_string().parse::<Flow>().unwrap(), flow);
        }
    }

    #[test]
    fn test_payment_status_aliases() {
        assert_eq!("PAID".parse::<PaymentStatus>().unwrap(), PaymentStatus::Paid);
        assert_eq!("late".parse::<PaymentStatus>().unwrap(), PaymentStatus::Overdue);
        assert!("partial".parse::<PaymentStatus>().is_err());
    }
}
