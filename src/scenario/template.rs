//! 场景模板：不可变定义，每回合克隆出一个新的 ScenarioInstance
//!
//! 每个模板携带主攻击向量（终端 / 账号 / 网络），遏制动作按向量判定是否生效，
//! 新增场景类型只需加模板，不必修改动作效果逻辑。

use serde::Serialize;

use crate::scenario::Action;

/// 默认步数预算
pub const DEFAULT_STEP_BUDGET: u32 = 10;

/// 主攻击向量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackVector {
    /// 终端侧（如勒索软件）：隔离主机可遏制
    Endpoint,
    /// 账号失陷：重置凭据可遏制
    Account,
    /// 网络 / C2：封禁网络指标可遏制
    Network,
}

impl AttackVector {
    /// 对该向量有效的遏制动作
    pub fn containment_action(self) -> Action {
        match self {
            AttackVector::Endpoint => Action::IsolateHost,
            AttackVector::Account => Action::ResetCredentials,
            AttackVector::Network => Action::BlockNetworkIndicator,
        }
    }

    /// 对该向量能发现佐证的调查动作（网络向量没有专属调查动作）
    pub fn corroborating_action(self) -> Option<Action> {
        match self {
            AttackVector::Endpoint => Some(Action::InspectEndpointLogs),
            AttackVector::Account => Some(Action::InspectAuthLogs),
            AttackVector::Network => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioTemplate {
    /// 目录内唯一标识
    pub name: String,
    /// 公开描述（开场告知分析员）
    pub description: String,
    pub critical_asset: String,
    pub attacker_objective: String,
    pub step_budget: u32,
    pub vector: AttackVector,
    /// 匹配的调查动作可见的佐证
    pub corroborating_evidence: Option<String>,
    /// 遏制成功时的效果描述
    pub containment_note: String,
}

/// 固定场景目录
pub fn default_catalog() -> Vec<ScenarioTemplate> {
    vec![
        ScenarioTemplate {
            name: "ransomware_workstation".to_string(),
            description: "Endpoint security raised an alert for suspicious encryption activity \
                on a finance department workstation."
                .to_string(),
            critical_asset: "FINANCE-PC-23".to_string(),
            attacker_objective: "Encrypt data and demand ransom".to_string(),
            step_budget: DEFAULT_STEP_BUDGET,
            vector: AttackVector::Endpoint,
            corroborating_evidence: Some(
                "Multiple file renames and encryption-like writes detected after opening an \
                email attachment."
                    .to_string(),
            ),
            containment_note: "Workstation isolated from network. Lateral movement risk reduced."
                .to_string(),
        },
        ScenarioTemplate {
            name: "compromised_user_account".to_string(),
            description: "Unusual login activity detected: repeated failed attempts followed by \
                a successful login from an unfamiliar location."
                .to_string(),
            critical_asset: "N/A".to_string(),
            attacker_objective: "Maintain access to user account and data".to_string(),
            step_budget: DEFAULT_STEP_BUDGET,
            vector: AttackVector::Account,
            corroborating_evidence: Some(
                "Burst of failed logins followed by a success from an unusual geo-location and \
                new device."
                    .to_string(),
            ),
            containment_note: "Password reset and sessions revoked. Malicious access likely cut off."
                .to_string(),
        },
        ScenarioTemplate {
            name: "c2_beaconing".to_string(),
            description: "Network monitoring detected outbound traffic to a known \
                command-and-control domain from a public-facing server."
                .to_string(),
            critical_asset: "WEB-SRV-10".to_string(),
            attacker_objective: "Maintain remote control over the host".to_string(),
            step_budget: DEFAULT_STEP_BUDGET,
            vector: AttackVector::Network,
            corroborating_evidence: None,
            containment_note: "Outbound beaconing stops after block rule applied.".to_string(),
        },
    ]
}
