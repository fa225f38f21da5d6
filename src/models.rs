#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    HsaAccount,
    Credit,
}

impl PaymentMethod {
    pub const ALL: &'static [PaymentMethod] = &[PaymentMethod::HsaAccount, PaymentMethod::Credit];

    /// Label as shown in the portal's payment-method dropdown.
    pub fn label(&self) -> &'static str {
        match self {
            Self::HsaAccount => "HSA Account",
            Self::Credit => "Credit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseType {
    Medical,
    Other,
}

impl ExpenseType {
    pub const ALL: &'static [ExpenseType] = &[ExpenseType::Medical, ExpenseType::Other];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Medical => "Medical",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Prescriptions,
    Therapy,
    Doctor,
    Dental,
    LabTests,
    Vision,
}

impl Category {
    pub const ALL: &'static [Category] = &[
        Category::Prescriptions,
        Category::Therapy,
        Category::Doctor,
        Category::Dental,
        Category::LabTests,
        Category::Vision,
    ];

    /// Label as shown in the portal's category dropdown.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Prescriptions => "Prescriptions",
            Self::Therapy => "Therapy / counseling",
            Self::Doctor => "Doctor",
            Self::Dental => "Dental",
            Self::LabTests => "Lab / Tests",
            Self::Vision => "Vision",
        }
    }
}

/// One ledger row as collected from the user.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// As entered, `NN/NN/NNNN`.
    pub date: String,
    pub provider: String,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub category: Category,
    pub expense_type: ExpenseType,
    pub receipt_number: String,
    pub in_hsa: bool,
    pub attachments: bool,
    pub notes: String,
    /// Receipt file stem, without `.pdf`.
    pub new_filename: String,
}

impl Transaction {
    pub fn receipt_file_name(&self) -> String {
        format!("{}.pdf", self.new_filename)
    }

    /// Only HSA-paid rows with a receipt on disk get an image on the portal.
    pub fn wants_upload(&self) -> bool {
        self.in_hsa && self.attachments
    }
}

/// Ledger row whose receipt has not been attached yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReceipt {
    /// Position among data rows (0 = first row below the header).
    pub index: usize,
    pub date: String,
    pub provider: String,
    pub amount: f64,
    pub receipt_number: String,
    pub new_filename: Option<String>,
}
