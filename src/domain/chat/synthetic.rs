//! Chat Context - 离线回复生成器
//!
//! 远程 agent 不可用时的本地回复，纯函数且对有限目录总是有结果

use rand::Rng;

use super::{Attachment, ChatResponse, FileKind, MessageKind};

/// 语音消息的固定确认回复
pub const AUDIO_ACKNOWLEDGEMENT: &str =
    "I heard your voice message! How can I help you with your finances today?";

const AUDIO_ACTIONS: &[&str] = &["Check Balance", "Recent Transactions", "Account Summary"];

/// 目录中的一条预置回复
#[derive(Debug, Clone, Copy)]
pub struct CannedReply {
    pub content: &'static str,
    pub image: Option<&'static str>,
    pub actions: &'static [&'static str],
}

impl CannedReply {
    fn to_response(self) -> ChatResponse {
        let mut response = ChatResponse::text(self.content).with_actions(self.actions.iter().copied());
        if let Some(image) = self.image {
            response = response.with_image(image);
        }
        response
    }
}

const CATALOG: &[CannedReply] = &[
    CannedReply {
        content: "I understand you're looking for financial advice. Based on your spending patterns, I'd recommend setting aside 20% of your income for savings.",
        image: None,
        actions: &[],
    },
    CannedReply {
        content: "Your current budget allocation looks good! You're spending $2,400 on essentials and $800 on discretionary items this month.",
        image: None,
        actions: &[],
    },
    CannedReply {
        content: "I can help you create a personalized budget plan. Here are some quick actions to get started:",
        image: None,
        actions: &["View Budget Template", "Set Savings Goal", "Track Expenses"],
    },
    CannedReply {
        content: "Your investment portfolio needs rebalancing. Current allocation: 60% stocks, 30% bonds, 10% cash. Consider these options:",
        image: None,
        actions: &["Rebalance Portfolio", "View Risk Assessment", "Schedule Consultation"],
    },
    CannedReply {
        content: "Here's your spending breakdown for this month. You can see that dining out represents 15% of your total expenses.",
        image: Some("https://via.placeholder.com/400x300/2D9A86/FFFFFF?text=Monthly+Spending+Chart"),
        actions: &[],
    },
    CannedReply {
        content: "Your investment growth over the past year shows a positive trend with 8.2% returns. Here's the detailed chart:",
        image: Some("https://via.placeholder.com/400x250/34D399/FFFFFF?text=Investment+Growth+Chart"),
        actions: &[],
    },
    CannedReply {
        content: "Your financial health score is 85/100! Here's a detailed breakdown with recommended actions:",
        image: Some("https://via.placeholder.com/400x300/EEFE6D/000000?text=Financial+Health+Score+85%2F100"),
        actions: &["Improve Credit Score", "Increase Emergency Fund", "Optimize Investments"],
    },
    CannedReply {
        content: "Market analysis shows tech stocks are performing well. Your portfolio allocation could benefit from adjustments:",
        image: Some("https://via.placeholder.com/400x280/F59E0B/FFFFFF?text=Market+Analysis+Chart"),
        actions: &["Buy Tech Stocks", "Sell Underperformers", "Set Price Alerts"],
    },
    CannedReply {
        content: "Great question! Emergency funds should typically cover 3-6 months of living expenses. Based on your current spending of $3,200/month, aim for $9,600-$19,200.",
        image: None,
        actions: &[],
    },
    CannedReply {
        content: "Tax season is approaching! I can help you prepare and potentially save money with these strategies:",
        image: None,
        actions: &["Tax Deduction Finder", "Upload Tax Documents", "Schedule Tax Review"],
    },
    CannedReply {
        content: "Your debt-to-income ratio is currently 28%, which is within the healthy range. Here's how it compares to recommended levels:",
        image: Some("https://via.placeholder.com/400x200/EF4444/FFFFFF?text=Debt-to-Income+Ratio+28%25"),
        actions: &[],
    },
    CannedReply {
        content: "Retirement planning analysis complete! You're on track but could optimize contributions for better returns:",
        image: Some("https://via.placeholder.com/400x320/8B5CF6/FFFFFF?text=Retirement+Projection+Chart"),
        actions: &["Increase 401k", "Open Roth IRA", "View Retirement Calculator"],
    },
];

/// 离线回复生成器
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticResponder;

impl SyntheticResponder {
    pub fn new() -> Self {
        Self
    }

    pub fn catalog() -> &'static [CannedReply] {
        CATALOG
    }

    /// 按消息类型和附件生成回复
    ///
    /// 优先级: 语音确认 > 文件模板 > 目录随机
    pub fn respond(&self, kind: MessageKind, file: Option<&Attachment>) -> ChatResponse {
        self.respond_with(&mut rand::thread_rng(), kind, file)
    }

    pub fn respond_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        kind: MessageKind,
        file: Option<&Attachment>,
    ) -> ChatResponse {
        if kind == MessageKind::Audio {
            return self.audio_acknowledgement();
        }
        match file {
            Some(file) => self.for_file(file),
            None => self.random_with(rng),
        }
    }

    pub fn audio_acknowledgement(&self) -> ChatResponse {
        ChatResponse::text(AUDIO_ACKNOWLEDGEMENT).with_actions(AUDIO_ACTIONS.iter().copied())
    }

    /// 按文件类别（image / PDF / 其他）套用模板
    pub fn for_file(&self, file: &Attachment) -> ChatResponse {
        match file.file_kind() {
            FileKind::Image => ChatResponse::text(format!(
                "I can see you've uploaded an image: \"{}\". This looks like a receipt or financial document. Let me analyze it for you.",
                file.file_name
            ))
            .with_actions(["Extract Amount", "Categorize Expense", "Add to Budget", "Save Receipt"]),
            FileKind::Pdf => ChatResponse::text(format!(
                "I've received your PDF document: \"{}\". I can help you extract financial information from statements, invoices, or reports.",
                file.file_name
            ))
            .with_actions(["Extract Transactions", "Summarize Document", "Add to Records"]),
            FileKind::Other => ChatResponse::text(format!(
                "Thank you for uploading \"{}\". I can help process this file and extract relevant financial information.",
                file.file_name
            ))
            .with_actions(["Process File", "Extract Data", "Save to Documents"]),
        }
    }

    /// 从目录中均匀随机选择一条
    pub fn random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> ChatResponse {
        CATALOG[rng.gen_range(0..CATALOG.len())].to_response()
    }
}
