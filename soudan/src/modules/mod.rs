// Modules Layer - 业务模块
//
// 按照六边形架构组织的业务模块：
// - config: 配置模块，处理服务地址、默认语言和录音参数
// - consultation: 多语言 AI 咨询模块，处理会话、发送和语音输入

pub mod config;
pub mod consultation;

pub use config::ConfigModule;
pub use consultation::ConsultationModule;
