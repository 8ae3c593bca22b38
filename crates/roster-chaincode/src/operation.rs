use std::fmt;

use serde::{Deserialize, Serialize};

/// Every operation the dispatcher accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Init,
    Read,
    Write,
    InitDomain,
    InitCompany,
    InitEmployee,
    SetDomain,
    SetCompany,
    DisableDomain,
    DisableCompany,
    DeleteEmployee,
    ReadAllData,
    GetHistory,
    GetAllEmployee,
    GetEmployeeById,
}

/// Wire names, resolved once per invocation.
const OPERATIONS: &[(&str, Operation)] = &[
    ("init", Operation::Init),
    ("read", Operation::Read),
    ("write", Operation::Write),
    ("init_domain", Operation::InitDomain),
    ("init_company", Operation::InitCompany),
    ("init_employee", Operation::InitEmployee),
    ("set_domain", Operation::SetDomain),
    ("set_company", Operation::SetCompany),
    ("disable_domain", Operation::DisableDomain),
    ("disable_company", Operation::DisableCompany),
    ("delete_employee", Operation::DeleteEmployee),
    ("read_all_data", Operation::ReadAllData),
    ("getHistory", Operation::GetHistory),
    ("getAllEmployee", Operation::GetAllEmployee),
    ("getEmployeeById", Operation::GetEmployeeById),
];

/// Accepted argument counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtMost(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Self::Exactly(n) => count == n,
            Self::AtMost(n) => count <= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "{n}"),
            Self::AtMost(n) => write!(f, "at most {n}"),
        }
    }
}

impl Operation {
    /// Resolve a wire name. Names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        OPERATIONS
            .iter()
            .find(|(wire, _)| *wire == name)
            .map(|(_, op)| *op)
    }

    pub fn name(&self) -> &'static str {
        OPERATIONS
            .iter()
            .find(|(_, op)| op == self)
            .map(|(wire, _)| *wire)
            .unwrap_or("unknown")
    }

    pub fn all() -> impl Iterator<Item = Operation> {
        OPERATIONS.iter().map(|(_, op)| *op)
    }

    pub fn arity(&self) -> Arity {
        match self {
            Self::Init => Arity::AtMost(1),
            Self::ReadAllData => Arity::Exactly(0),
            Self::Read | Self::GetHistory | Self::GetEmployeeById => Arity::Exactly(1),
            Self::Write
            | Self::InitDomain
            | Self::InitCompany
            | Self::DisableDomain
            | Self::DisableCompany
            | Self::DeleteEmployee
            | Self::GetAllEmployee => Arity::Exactly(2),
            Self::SetDomain | Self::SetCompany => Arity::Exactly(3),
            Self::InitEmployee => Arity::Exactly(8),
        }
    }

    /// Returns `true` if the operation never writes.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Self::Read
                | Self::ReadAllData
                | Self::GetHistory
                | Self::GetAllEmployee
                | Self::GetEmployeeById
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named operation and its positional arguments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(function: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            function: function.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a whitespace-separated line into function and arguments.
    /// Returns `None` for a blank line.
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let function = words.next()?;
        Some(Self::new(function, words))
    }
}
