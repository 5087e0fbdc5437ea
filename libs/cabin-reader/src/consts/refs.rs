use crate::consts::{ConstPtr, ConstantInfo, ConstantPool, UTF8Const};
use crate::{impl_constant, Constant};

#[derive(Copy, Clone, Debug)]
pub struct ClassConst {
	pub name: ConstPtr<UTF8Const>,
}

impl ClassConst {
	pub fn name<'a>(&self, cp: &'a ConstantPool) -> Option<&'a str> {
		self.name.get(cp).map(UTF8Const::as_str)
	}
}

#[derive(Copy, Clone, Debug)]
pub struct StringConst {
	pub string: ConstPtr<UTF8Const>,
}

#[derive(Copy, Clone, Debug)]
pub struct NameAndTypeConst {
	pub name: ConstPtr<UTF8Const>,
	pub descriptor: ConstPtr<UTF8Const>,
}

/// A field, method or interface method reference.
#[derive(Copy, Clone, Debug)]
pub struct MemberConst {
	pub class: ConstPtr<ClassConst>,
	pub name_and_type: ConstPtr<NameAndTypeConst>,
}

impl MemberConst {
	/// Owner, name and descriptor of the member.
	pub fn resolve<'a>(&self, cp: &'a ConstantPool) -> Option<(&'a str, &'a str, &'a str)> {
		let class = self.class.get(cp)?.name(cp)?;
		let name_and_type = self.name_and_type.get(cp)?;
		Some((
			class,
			name_and_type.name.get(cp)?.as_str(),
			name_and_type.descriptor.get(cp)?.as_str(),
		))
	}
}

impl Constant for MemberConst {
	fn get(value: &ConstantInfo) -> Option<&Self> {
		match value {
			ConstantInfo::Field(member) | ConstantInfo::Method(member) | ConstantInfo::Interface(member) => {
				Some(member)
			}
			_ => None,
		}
	}
}

#[derive(Copy, Clone, Debug)]
pub struct MethodHandleConst {
	pub reference_kind: u8,
	pub reference_index: u16,
}

#[derive(Copy, Clone, Debug)]
pub struct MethodTypeConst {
	pub descriptor: ConstPtr<UTF8Const>,
}

/// Both `CONSTANT_Dynamic` and `CONSTANT_InvokeDynamic`.
#[derive(Copy, Clone, Debug)]
pub struct DynamicConst {
	pub bootstrap_method_attr_index: u16,
	pub name_and_type: ConstPtr<NameAndTypeConst>,
}

impl Constant for DynamicConst {
	fn get(value: &ConstantInfo) -> Option<&Self> {
		match value {
			ConstantInfo::Dynamic(dynamic) | ConstantInfo::InvokeDynamic(dynamic) => Some(dynamic),
			_ => None,
		}
	}
}

/// A module or package name.
#[derive(Copy, Clone, Debug)]
pub struct ModuleConst {
	pub name: ConstPtr<UTF8Const>,
}

impl_constant!(Class ClassConst);
impl_constant!(String StringConst);
impl_constant!(NameAndType NameAndTypeConst);
impl_constant!(MethodHandle MethodHandleConst);
impl_constant!(MethodType MethodTypeConst);
